pub mod embedding;
pub mod gemini;
pub mod openai;

use crate::{
    errors::PromptError,
    types::{Completion, CompletionRequest},
};
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use embedding::{ApiEmbeddingProvider, EmbeddingProvider};
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This trait is the service boundary of the crate: an implementation issues one
/// request to a remote completion endpoint and returns the raw reply text. Parsing
/// and validating that text against a schema happens outside the provider, in
/// [`crate::structured`], so it can be tested without a network.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Issues a single completion request.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, PromptError>;

    /// Generates a response from a given system and user prompt.
    ///
    /// Returns the text of the first choice, or an empty string if the provider
    /// returned no choices.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        let request = CompletionRequest::new(system_prompt, user_prompt);
        let completion = self.complete(&request).await?;
        Ok(completion.content().unwrap_or_default().to_string())
    }
}

dyn_clone::clone_trait_object!(AiProvider);
