//! # AI Provider Factory
//!
//! This module centralizes the logic for creating AI provider instances from a
//! [`ProviderConfig`], so every consumer (CLI, examples, tests) builds providers
//! the same way.

use crate::{
    constants::DEFAULT_OPENAI_API_URL,
    errors::PromptError,
    providers::ai::{gemini::GeminiProvider, openai::OpenAiProvider, AiProvider},
    types::ProviderConfig,
};
use tracing::info;

/// Creates an AI provider instance from its configuration.
///
/// - `openai`: OpenAI's API; requires an API key. The URL defaults to the public endpoint.
/// - `local`: any OpenAI-compatible server; requires `api_url`, the key is optional.
/// - `gemini`: Google Gemini; requires an API key. The URL is derived from the model when absent.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn AiProvider>, PromptError> {
    let api_key = config.api_key.clone().filter(|k| !k.trim().is_empty());

    let provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "openai" => {
            let api_key = api_key.ok_or(PromptError::MissingApiKey)?;
            let api_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string());
            info!("Configuring OpenAI provider with URL: {}", api_url);
            Box::new(OpenAiProvider::new(
                api_url,
                Some(api_key),
                Some(config.model_name.clone()),
            )?)
        }
        "local" => {
            let api_url = config.api_url.clone().ok_or_else(|| {
                PromptError::MissingAiProvider(
                    "api_url must be set for the local provider".to_string(),
                )
            })?;
            info!("Configuring local AI provider with URL: {}", api_url);
            Box::new(OpenAiProvider::new(
                api_url,
                api_key,
                Some(config.model_name.clone()),
            )?)
        }
        "gemini" => {
            let api_key = api_key.ok_or(PromptError::MissingApiKey)?;
            let api_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| GeminiProvider::api_url_for_model(&config.model_name));
            info!("Configuring Gemini provider with URL: {}", api_url);
            Box::new(GeminiProvider::new(api_url, api_key)?)
        }
        other => return Err(PromptError::UnsupportedProvider(other.to_string())),
    };

    Ok(provider)
}
