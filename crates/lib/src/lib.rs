//! # Structured Prompt Utilities
//!
//! This crate provides a client that sends prompts to a configurable AI provider and
//! coerces the replies into typed, schema-validated Rust values: support ticket
//! classification, PII extraction and scrubbing, and text tagging. It also carries a
//! call logger usable as provider middleware, chat prompt templates, and the vector
//! store and retriever used by the retrieval plugins.

pub mod call_log;
pub mod constants;
pub mod errors;
pub mod prompts;
pub mod providers;
pub mod rag;
pub mod schemas;
pub mod structured;
pub mod types;

pub use call_log::{CallLogRow, CallLogger, LoggedProvider, LoggingError};
pub use errors::{ErrorKind, PromptError};
pub use structured::{structured_query, StructuredResponse};
pub use types::{
    ChatMessage, Completion, CompletionRequest, PromptClient, PromptClientBuilder,
    ProviderConfig, ResponseSchema, Role,
};

use crate::{
    prompts::{
        classification::CLASSIFICATION_SYSTEM_PROMPT,
        pii::PII_EXTRACTION_SYSTEM_PROMPT,
        tagging::{
            INTENSITY_SYSTEM_PROMPT, OVERVIEW_SYSTEM_PROMPT, PEOPLE_EXTRACTION_SYSTEM_PROMPT,
            SENTIMENT_SYSTEM_PROMPT,
        },
    },
    providers::ai::AiProvider,
    schemas::{Information, Intensity, MultiClassPrediction, Overview, PiiData, Sentiment},
    structured::{build_structured_request, execute_structured_request},
};
use tracing::{debug, info};

impl PromptClient {
    pub fn ai_provider(&self) -> &dyn AiProvider {
        self.ai_provider.as_ref()
    }

    /// The model sent with every request that does not name its own.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Runs a structured query against the client's default model.
    pub async fn structured_query<T: StructuredResponse>(
        &self,
        system_prompt: &str,
        query: &str,
    ) -> Result<T, PromptError> {
        self.structured_query_with_model(system_prompt, query, &self.model)
            .await
    }

    /// Runs a structured query against `model`, applying the client's temperature and
    /// token limit.
    pub async fn structured_query_with_model<T: StructuredResponse>(
        &self,
        system_prompt: &str,
        query: &str,
        model: &str,
    ) -> Result<T, PromptError> {
        let request = build_structured_request::<T>(system_prompt, query, model)?
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        debug!(system_prompt = %system_prompt, query = %query, "--> Sending structured query");
        execute_structured_request(self.ai_provider.as_ref(), &request).await
    }

    /// Assigns every applicable support ticket label to `content`.
    ///
    /// A message with no clear signal yields an empty label set, not an error.
    pub async fn classify(&self, content: &str) -> Result<MultiClassPrediction, PromptError> {
        let prediction: MultiClassPrediction = self
            .structured_query(CLASSIFICATION_SYSTEM_PROMPT, content)
            .await?;
        info!(
            "[classify] predicted {} label(s): {:?}",
            prediction.predicted_labels.len(),
            prediction.predicted_labels
        );
        Ok(prediction)
    }

    pub async fn extract_pii(&self, content: &str) -> Result<PiiData, PromptError> {
        self.structured_query(PII_EXTRACTION_SYSTEM_PROMPT, content)
            .await
    }

    /// Extracts the PII in `content`, then replaces it with typed placeholders.
    pub async fn scrub_pii(&self, content: &str) -> Result<String, PromptError> {
        let pii = self.extract_pii(content).await?;
        info!("[scrub_pii] found {} PII value(s).", pii.pii_data.len());
        Ok(pii.scrub_data(content))
    }

    pub async fn tag_overview(&self, content: &str) -> Result<Overview, PromptError> {
        self.structured_query(OVERVIEW_SYSTEM_PROMPT, content).await
    }

    pub async fn extract_people(&self, content: &str) -> Result<Information, PromptError> {
        self.structured_query(PEOPLE_EXTRACTION_SYSTEM_PROMPT, content)
            .await
    }

    pub async fn detect_sentiment(&self, content: &str) -> Result<Sentiment, PromptError> {
        self.structured_query(SENTIMENT_SYSTEM_PROMPT, content).await
    }

    pub async fn detect_intensity(&self, content: &str) -> Result<Intensity, PromptError> {
        self.structured_query(INTENSITY_SYSTEM_PROMPT, content).await
    }
}
