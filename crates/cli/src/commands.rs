//! Subcommand handlers. Each builds what it needs from the loaded configuration,
//! runs one library call and prints the result.

use crate::{
    config::AppConfig, ChatArgs, Commands, ExtractionKind, IndexArgs, InputArgs, PdfExtractArgs,
    RetrieveArgs,
};
use anyhow::{bail, Context, Result};
use anyprompt::{
    prompts::{build_prompt, PromptChain},
    providers::{
        ai::{AiProvider, ApiEmbeddingProvider, EmbeddingProvider},
        factory::create_provider,
    },
    rag::{build_vector_store, DocumentLoader, VectorIndex},
    CallLogger, PromptClient, PromptClientBuilder,
};
use anyprompt_pdf::{read_pdf, PdfLoader};
use anyprompt_text::{RecursiveCharacterSplitter, TextLoader};
use serde::Serialize;
use std::{fs::File, path::Path};
use tracing::info;

pub async fn run(
    command: &Commands,
    config: &AppConfig,
    model_override: Option<&str>,
    call_logger: Option<&CallLogger>,
) -> Result<()> {
    match command {
        Commands::Classify(args) => {
            let client = build_client(config, model_override, call_logger)?;
            print_json(&client.classify(&args.read().await?).await?)
        }
        Commands::Scrub(args) => {
            let client = build_client(config, model_override, call_logger)?;
            println!("{}", client.scrub_pii(&args.read().await?).await?);
            Ok(())
        }
        Commands::Pii(args) => {
            let client = build_client(config, model_override, call_logger)?;
            print_json(&client.extract_pii(&args.read().await?).await?)
        }
        Commands::Tag(args) => {
            let client = build_client(config, model_override, call_logger)?;
            print_json(&client.tag_overview(&args.read().await?).await?)
        }
        Commands::People(args) => {
            let client = build_client(config, model_override, call_logger)?;
            print_json(&client.extract_people(&args.read().await?).await?)
        }
        Commands::PdfExtract(args) => {
            handle_pdf_extract(args, config, model_override, call_logger).await
        }
        Commands::Chat(args) => handle_chat(args, config, model_override, call_logger).await,
        Commands::Index(args) => handle_index(args, config).await,
        Commands::Retrieve(args) => handle_retrieve(args, config).await,
    }
}

impl InputArgs {
    /// Returns the positional text, or the contents of `--file`.
    async fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read input file '{}'", path.display())),
            (None, None) => bail!("Provide the input text as an argument or with --file."),
        }
    }
}

fn build_provider(
    config: &AppConfig,
    model_override: Option<&str>,
    call_logger: Option<&CallLogger>,
) -> Result<(Box<dyn AiProvider>, String)> {
    let mut provider_config = config.provider.clone();
    if let Some(model) = model_override {
        provider_config.model_name = model.to_string();
    }

    let mut provider = create_provider(&provider_config)?;
    if let Some(logger) = call_logger {
        provider = Box::new(logger.intercept(provider));
    }
    Ok((provider, provider_config.model_name))
}

fn build_client(
    config: &AppConfig,
    model_override: Option<&str>,
    call_logger: Option<&CallLogger>,
) -> Result<PromptClient> {
    let (provider, model) = build_provider(config, model_override, call_logger)?;
    let mut builder = PromptClientBuilder::new().ai_provider(provider).model(model);
    if let Some(temperature) = config.temperature {
        builder = builder.temperature(temperature);
    }
    if let Some(max_tokens) = config.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    Ok(builder.build()?)
}

fn build_index(config: &AppConfig) -> Result<VectorIndex> {
    let Some(embedding) = &config.embedding else {
        bail!("An `embedding` section is required in the configuration for indexing and retrieval.");
    };
    let embedder: Box<dyn EmbeddingProvider> = Box::new(ApiEmbeddingProvider::new(
        embedding.api_url.clone(),
        embedding.model_name.clone(),
        embedding.api_key.clone(),
    )?);
    Ok(VectorIndex::new(
        &config.vector_store.persist_directory,
        embedder,
    ))
}

async fn handle_pdf_extract(
    args: &PdfExtractArgs,
    config: &AppConfig,
    model_override: Option<&str>,
    call_logger: Option<&CallLogger>,
) -> Result<()> {
    let text = read_pdf(&args.path).await?;
    let client = build_client(config, model_override, call_logger)?;
    match args.kind {
        ExtractionKind::Overview => print_json(&client.tag_overview(&text).await?),
        ExtractionKind::People => print_json(&client.extract_people(&text).await?),
    }
}

async fn handle_chat(
    args: &ChatArgs,
    config: &AppConfig,
    model_override: Option<&str>,
    call_logger: Option<&CallLogger>,
) -> Result<()> {
    let (provider, model) = build_provider(config, model_override, call_logger)?;
    let chain = PromptChain::new(build_prompt(&args.template), provider).with_model(model);
    println!("{}", chain.run(&args.input.read().await?).await?);
    Ok(())
}

async fn handle_index(args: &IndexArgs, config: &AppConfig) -> Result<()> {
    let index = build_index(config)?;
    let splitter =
        RecursiveCharacterSplitter::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;
    let loader = loader_for(&args.path);

    let store = build_vector_store(loader.as_ref(), &splitter, &index, !args.no_persist).await?;
    let count = store.count().await?;
    info!("Indexed '{}' into {}.", args.path.display(), store.location());
    print_json(&serde_json::json!({
        "location": store.location(),
        "chunks": count,
    }))
}

async fn handle_retrieve(args: &RetrieveArgs, config: &AppConfig) -> Result<()> {
    let store = build_index(config)?.load().await?;
    let retriever = store.as_retriever(args.k.unwrap_or(config.retrieval.k));
    print_json(&retriever.get_relevant_documents(&args.query).await?)
}

fn loader_for(path: &Path) -> Box<dyn DocumentLoader> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        Box::new(PdfLoader::new(path))
    } else {
        Box::new(TextLoader::new(path))
    }
}

/// Writes the call log as CSV to `path` and returns the number of rows written.
pub fn export_call_log(logger: &CallLogger, path: &Path) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    logger.write_csv(file)?;
    Ok(logger.len()?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
