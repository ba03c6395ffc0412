//! # anyprompt: A CLI for structured prompting
//!
//! This is the main entry point for the `anyprompt` command-line interface. Every
//! subcommand prints its result as JSON (or plain text for `chat`) on stdout; logs
//! go to stderr.

mod commands;
mod config;

use anyhow::Result;
use anyprompt::CallLogger;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML configuration file (defaults to ./config.yml when present)
    #[arg(long, global = true)]
    config: Option<String>,
    /// Override the configured model name
    #[arg(long, global = true, env = "ANYPROMPT_MODEL")]
    model: Option<String>,
    /// Record every model call and write the log to this CSV file on exit
    #[arg(long, global = true)]
    call_log: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a support ticket into zero or more labels
    Classify(InputArgs),
    /// Replace every piece of PII with a typed placeholder
    Scrub(InputArgs),
    /// List the PII found in a text
    Pii(InputArgs),
    /// Produce a tagged overview of a text
    Tag(InputArgs),
    /// Extract the people mentioned in a text
    People(InputArgs),
    /// Read a PDF and run an extraction over its text
    PdfExtract(PdfExtractArgs),
    /// Run a single-template chat prompt
    Chat(ChatArgs),
    /// Split a text or PDF file into chunks and index them
    Index(IndexArgs),
    /// Retrieve the indexed chunks closest to a query
    Retrieve(RetrieveArgs),
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// The text to process
    pub text: Option<String>,
    /// Read the text from a file instead
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractionKind {
    Overview,
    People,
}

#[derive(Args, Debug)]
pub struct PdfExtractArgs {
    /// The PDF file to read
    pub path: PathBuf,
    #[arg(long, value_enum, default_value_t = ExtractionKind::Overview)]
    pub kind: ExtractionKind,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// The system template; `{input}` is replaced by the input text
    #[arg(long)]
    pub template: String,
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// A text or PDF file
    pub path: PathBuf,
    /// Index into an in-memory store and discard it afterwards
    #[arg(long)]
    pub no_persist: bool,
}

#[derive(Args, Debug)]
pub struct RetrieveArgs {
    pub query: String,
    /// Number of chunks to return (defaults to the configured value)
    #[arg(short, long)]
    pub k: Option<usize>,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let app_config = config::get_config(cli.config.as_deref())?;
    let call_logger = cli.call_log.as_ref().map(|_| CallLogger::new());

    let result = commands::run(
        &cli.command,
        &app_config,
        cli.model.as_deref(),
        call_logger.as_ref(),
    )
    .await;

    // The log is written even when the command failed. An export failure is only
    // reported; the command's own outcome is what the process returns.
    if let (Some(path), Some(logger)) = (&cli.call_log, &call_logger) {
        match commands::export_call_log(logger, path) {
            Ok(rows) => info!("Wrote {} call log row(s) to {}.", rows, path.display()),
            Err(e) => error!("Failed to write the call log to {}: {e:#}", path.display()),
        }
    }

    result
}
