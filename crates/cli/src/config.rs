//! # Application Configuration
//!
//! This module defines the configuration structure for the `anyprompt` CLI and
//! provides the logic for loading it from a YAML file and environment variables.

use anyprompt::{
    constants::{DEFAULT_MODEL, DEFAULT_RETRIEVER_K},
    ProviderConfig,
};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::info;

/// The configuration file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct AppConfig {
    /// The AI provider used for every prompt.
    pub provider: ProviderConfig,
    /// Sampling temperature sent with structured queries, if set.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Token limit sent with structured queries, if set.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Configuration for the text embedding model. Required by `index` and `retrieve`.
    #[serde(default)]
    pub embedding: Option<EmbeddingConfig>,
    pub vector_store: VectorStoreConfig,
    pub retrieval: RetrievalConfig,
    pub chunking: ChunkingConfig,
}

/// Configuration for the embedding model provider.
#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub model_name: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct VectorStoreConfig {
    pub persist_directory: String,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RetrievalConfig {
    pub k: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration.
///
/// Layers, lowest precedence first:
/// 1. built-in defaults,
/// 2. the YAML file at `config_path_override`, or `./config.yml` when present, with
///    `${VAR}` references replaced from the environment,
/// 3. `ANYPROMPT_`-prefixed environment variables, using `__` for nesting
///    (e.g. `ANYPROMPT_PROVIDER__MODEL_NAME`).
///
/// A file that was asked for explicitly but does not exist is a `ConfigError::NotFound`.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults.
        .set_default("provider.provider", "openai")?
        .set_default("provider.model_name", DEFAULT_MODEL)?
        .set_default("vector_store.persist_directory", "db")?
        .set_default("retrieval.k", DEFAULT_RETRIEVER_K as u64)?
        .set_default("chunking.chunk_size", 1000u64)?
        .set_default("chunking.chunk_overlap", 200u64)?;

    // Layer 2: YAML file.
    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            if let Some(content) = read_and_substitute(DEFAULT_CONFIG_FILE)? {
                info!("Loading configuration from '{DEFAULT_CONFIG_FILE}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            }
        }
    }

    let settings = builder
        // Layer 3: Prefixed environment variables for overrides.
        .add_source(
            Environment::with_prefix("ANYPROMPT")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
