#![allow(dead_code)]
//! # Common Test Utilities
//!
//! This module provides shared utilities for testing, such as scripted AI
//! providers and a deterministic embedder, to ensure tests are isolated and repeatable.

use anyprompt::{
    providers::ai::{AiProvider, EmbeddingProvider},
    Completion, CompletionRequest, PromptError,
};
use async_trait::async_trait;
use dotenvy::dotenv;
use std::fmt::Debug;
use std::sync::{Arc, Once, RwLock};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// --- Scripted AI Provider for Logic Testing ---

/// Returns queued replies in order and records every request it receives.
#[derive(Clone, Debug)]
pub struct ScriptedAiProvider {
    pub call_history: Arc<RwLock<Vec<CompletionRequest>>>,
    pub responses: Arc<RwLock<Vec<String>>>,
    pub model: Option<String>,
}

impl ScriptedAiProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(
                responses.into_iter().rev().map(String::from).collect(),
            )),
            model: None,
        }
    }

    /// Reports `model` as the model that produced every reply.
    pub fn reporting_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.call_history.read().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for ScriptedAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, PromptError> {
        self.call_history.write().unwrap().push(request.clone());

        let choices = match self.responses.write().unwrap().pop() {
            Some(response) => vec![response],
            None => Vec::new(),
        };
        Ok(Completion {
            model: self.model.clone(),
            choices,
        })
    }
}

// --- Failing AI Provider ---

/// Always fails with an API error carrying `status`.
#[derive(Clone, Debug)]
pub struct FailingAiProvider {
    pub status: u16,
    pub calls: Arc<RwLock<usize>>,
}

impl FailingAiProvider {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            calls: Arc::new(RwLock::new(0)),
        }
    }
}

#[async_trait]
impl AiProvider for FailingAiProvider {
    async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, PromptError> {
        *self.calls.write().unwrap() += 1;
        Err(PromptError::AiApi {
            status: self.status,
            message: "mock provider failure".to_string(),
        })
    }
}

// --- Keyword Embedder ---

/// Embeds text as keyword counts over a fixed vocabulary, plus a constant bias
/// dimension so no vector is all zeros.
#[derive(Clone, Debug)]
pub struct KeywordEmbedder {
    vocabulary: Vec<String>,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn model_name(&self) -> &str {
        "keyword-embedder"
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>, PromptError> {
        let lower = input.to_lowercase();
        let mut vector: Vec<f32> = self
            .vocabulary
            .iter()
            .map(|word| lower.matches(word.as_str()).count() as f32)
            .collect();
        vector.push(0.1);
        Ok(vector)
    }
}
