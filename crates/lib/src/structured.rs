//! # Structured Model Query
//!
//! Sends a system instruction and a user payload to an [`AiProvider`], asking for a reply
//! that conforms to the JSON schema of a Rust type, then parses and validates that reply.
//!
//! The work is split in two: [`build_structured_request`] plus the
//! provider's `complete` issue the call, and [`parse_structured_response`] turns raw
//! reply text into a validated value without touching the network.

use crate::{
    errors::PromptError,
    providers::ai::AiProvider,
    types::{CompletionRequest, ResponseSchema},
};
use regex::Regex;
use schemars::{gen::SchemaSettings, JsonSchema};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// A type that can be requested from a model as a structured reply.
///
/// The JSON schema comes from the `JsonSchema` derive and deserialization from serde,
/// which together enforce field presence, primitive types and closed enumerations.
/// `validate` adds constraints the type system cannot express.
pub trait StructuredResponse: DeserializeOwned + JsonSchema + Send {
    /// Checks cross-field constraints after deserialization.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Generates the [`ResponseSchema`] for `T`.
pub fn response_schema<T: StructuredResponse>() -> Result<ResponseSchema, PromptError> {
    let mut settings = SchemaSettings::draft2019_09();
    settings.meta_schema = None;
    let root = settings.into_generator().into_root_schema_for::<T>();

    let description = root
        .schema
        .metadata
        .as_ref()
        .and_then(|m| m.description.clone());

    Ok(ResponseSchema {
        name: T::schema_name(),
        description,
        schema: serde_json::to_value(&root)?,
    })
}

/// Builds a completion request carrying one system message, one user message,
/// the model identifier and the schema of `T`.
pub fn build_structured_request<T: StructuredResponse>(
    system_prompt: &str,
    query: &str,
    model: &str,
) -> Result<CompletionRequest, PromptError> {
    Ok(CompletionRequest::new(system_prompt, query)
        .with_model(model)
        .with_response_schema(response_schema::<T>()?))
}

/// Returns the JSON document inside a reply.
///
/// A reply that is already valid JSON is used as is, even when its string values
/// contain backtick fences. Otherwise the first fenced code block is unwrapped.
fn extract_json_payload(raw: &str) -> Result<&str, PromptError> {
    let trimmed = raw.trim();
    if serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Ok(trimmed);
    }

    let re = Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```")?;
    Ok(re
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed))
}

/// Parses raw reply text into a validated `T`.
///
/// Fails with `PromptError::Validation` if the text is not JSON, does not match the
/// shape of `T`, or violates `T::validate`. A partially valid value is never returned.
pub fn parse_structured_response<T: StructuredResponse>(raw: &str) -> Result<T, PromptError> {
    let schema_name = T::schema_name();
    let payload = extract_json_payload(raw)?;

    if payload.is_empty() {
        return Err(PromptError::validation(schema_name, "the reply was empty"));
    }

    let value: T = serde_json::from_str(payload)
        .map_err(|e| PromptError::validation(&schema_name, e.to_string()))?;

    value
        .validate()
        .map_err(|reason| PromptError::validation(schema_name, reason))?;

    Ok(value)
}

/// Sends an already-built structured request and parses the first choice.
pub async fn execute_structured_request<T: StructuredResponse>(
    ai_provider: &dyn AiProvider,
    request: &CompletionRequest,
) -> Result<T, PromptError> {
    let completion = ai_provider.complete(request).await?;

    let raw = completion.content().ok_or_else(|| {
        PromptError::validation(T::schema_name(), "the reply contained no choices")
    })?;

    debug!("<-- Structured reply: {}", raw);

    parse_structured_response(raw)
}

/// Issues one schema-constrained request and returns the populated `T`.
///
/// Transport failures are returned exactly as the provider reported them; there is
/// no retry.
#[instrument(skip(ai_provider, system_prompt, query))]
pub async fn structured_query<T: StructuredResponse>(
    ai_provider: &dyn AiProvider,
    system_prompt: &str,
    query: &str,
    model: &str,
) -> Result<T, PromptError> {
    let request = build_structured_request::<T>(system_prompt, query, model)?;
    execute_structured_request(ai_provider, &request).await
}
