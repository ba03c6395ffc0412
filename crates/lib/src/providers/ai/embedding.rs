//! # Embeddings Provider
//!
//! This module provides functionality for generating vector embeddings by calling
//! an external, OpenAI-compatible or Gemini embeddings API.

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

/// A trait for turning text into an embedding vector.
///
/// The vector store only depends on this trait, so tests can substitute a
/// deterministic implementation for the remote API.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug + DynClone {
    /// The name of the embedding model, stored alongside each vector.
    fn model_name(&self) -> &str;

    /// Generates the embedding for a single input.
    async fn embed(&self, input: &str) -> Result<Vec<f32>, PromptError>;
}

dyn_clone::clone_trait_object!(EmbeddingProvider);

/// The payload shape an embeddings endpoint expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EmbeddingApi {
    Gemini,
    OpenAiCompatible,
}

impl EmbeddingApi {
    fn for_url(api_url: &str) -> Self {
        if api_url.contains("generativelanguage.googleapis.com") {
            EmbeddingApi::Gemini
        } else {
            EmbeddingApi::OpenAiCompatible
        }
    }
}

/// An [`EmbeddingProvider`] backed by a remote embeddings endpoint.
///
/// Gemini endpoints get a `models/`-prefixed model and the key in `x-goog-api-key`;
/// every other URL is treated as OpenAI-compatible with bearer auth.
#[derive(Clone, Debug)]
pub struct ApiEmbeddingProvider {
    client: ReqwestClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
    api: EmbeddingApi,
}

impl ApiEmbeddingProvider {
    pub fn new(
        api_url: String,
        model: String,
        api_key: Option<String>,
    ) -> Result<Self, PromptError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        let api = EmbeddingApi::for_url(&api_url);
        Ok(Self {
            client,
            api_url,
            model,
            api_key,
            api,
        })
    }

    fn request(&self, input: &str) -> RequestBuilder {
        let request_builder = self.client.post(&self.api_url);
        match self.api {
            EmbeddingApi::Gemini => {
                let model = if self.model.starts_with("models/") {
                    self.model.clone()
                } else {
                    format!("models/{}", self.model)
                };
                let body = GeminiEmbeddingRequest {
                    model,
                    content: GeminiEmbeddingContent {
                        parts: vec![GeminiEmbeddingPart { text: input }],
                    },
                };
                debug!(payload = ?body, "--> Sending request to Gemini Embeddings API");
                let request_builder = request_builder.json(&body);
                match &self.api_key {
                    Some(key) => request_builder.header("x-goog-api-key", key),
                    None => request_builder,
                }
            }
            EmbeddingApi::OpenAiCompatible => {
                let body = OpenAIEmbeddingRequest {
                    model: &self.model,
                    input,
                };
                debug!(payload = ?body, "--> Sending request to OpenAI-compatible Embeddings API");
                let request_builder = request_builder.json(&body);
                match &self.api_key {
                    Some(key) => request_builder.bearer_auth(key),
                    None => request_builder,
                }
            }
        }
    }
}

#[async_trait]
impl EmbeddingProvider for ApiEmbeddingProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>, PromptError> {
        let response = self
            .request(input)
            .send()
            .await
            .map_err(PromptError::AiRequest)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PromptError::AiApi {
                status: status.as_u16(),
                message: error_text,
            });
        }

        match self.api {
            EmbeddingApi::Gemini => {
                let reply: GeminiEmbeddingResponse = response
                    .json()
                    .await
                    .map_err(PromptError::AiDeserialization)?;
                Ok(reply.embedding.values)
            }
            EmbeddingApi::OpenAiCompatible => {
                let reply: OpenAIEmbeddingResponse = response
                    .json()
                    .await
                    .map_err(PromptError::AiDeserialization)?;
                reply
                    .data
                    .into_iter()
                    .next()
                    .map(|d| d.embedding)
                    .ok_or_else(|| {
                        PromptError::validation("embedding", "the reply contained no embeddings")
                    })
            }
        }
    }
}

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize, Debug)]
struct OpenAIEmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize, Debug)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct OpenAIEmbeddingData {
    embedding: Vec<f32>,
}

// --- Gemini-specific request and response structures ---

#[derive(Serialize, Debug)]
struct GeminiEmbeddingRequest<'a> {
    model: String,
    content: GeminiEmbeddingContent<'a>,
}

#[derive(Serialize, Debug)]
struct GeminiEmbeddingContent<'a> {
    parts: Vec<GeminiEmbeddingPart<'a>>,
}

#[derive(Serialize, Debug)]
struct GeminiEmbeddingPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GeminiEmbeddingResponse {
    embedding: GeminiEmbeddingValue,
}

#[derive(Deserialize, Debug)]
struct GeminiEmbeddingValue {
    values: Vec<f32>,
}
