//! # Chat Prompt Templates
//!
//! A chat template is an ordered list of `(role, text)` pairs whose text may contain an
//! `{input}` placeholder. Formatting a template substitutes the caller's input and yields
//! the messages of a [`CompletionRequest`].

use crate::{
    errors::PromptError,
    providers::ai::AiProvider,
    structured::{execute_structured_request, response_schema, StructuredResponse},
    types::{ChatMessage, CompletionRequest, Role},
};
use tracing::debug;

/// The placeholder replaced by the caller's input.
pub const INPUT_PLACEHOLDER: &str = "{input}";

#[derive(Debug, Clone, PartialEq)]
pub struct ChatPromptTemplate {
    messages: Vec<(Role, String)>,
}

impl ChatPromptTemplate {
    pub fn from_messages<S: Into<String>>(messages: Vec<(Role, S)>) -> Self {
        Self {
            messages: messages
                .into_iter()
                .map(|(role, text)| (role, text.into()))
                .collect(),
        }
    }

    pub fn messages(&self) -> &[(Role, String)] {
        &self.messages
    }

    /// Substitutes `input` for every `{input}` placeholder.
    pub fn format_messages(&self, input: &str) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .map(|(role, text)| ChatMessage {
                role: *role,
                content: text.replace(INPUT_PLACEHOLDER, input),
            })
            .collect()
    }

    /// Formats the template into a completion request.
    pub fn to_request(&self, input: &str) -> CompletionRequest {
        CompletionRequest {
            messages: self.format_messages(input),
            ..Default::default()
        }
    }
}

/// Builds the standard two-message template: `template` as the system message,
/// followed by the raw input as the user message.
pub fn build_prompt(template: &str) -> ChatPromptTemplate {
    ChatPromptTemplate::from_messages(vec![
        (Role::System, template),
        (Role::User, INPUT_PLACEHOLDER),
    ])
}

/// A single-step chain: format a template with the input, then call the provider.
#[derive(Debug, Clone)]
pub struct PromptChain {
    template: ChatPromptTemplate,
    ai_provider: Box<dyn AiProvider>,
    model: Option<String>,
}

impl PromptChain {
    pub fn new(template: ChatPromptTemplate, ai_provider: Box<dyn AiProvider>) -> Self {
        Self {
            template,
            ai_provider,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn request(&self, input: &str) -> CompletionRequest {
        let mut request = self.template.to_request(input);
        request.model = self.model.clone();
        request
    }

    /// Runs the chain and returns the reply text.
    pub async fn run(&self, input: &str) -> Result<String, PromptError> {
        let request = self.request(input);
        debug!(messages = ?request.messages, "--> Running prompt chain");
        let completion = self.ai_provider.complete(&request).await?;
        Ok(completion.content().unwrap_or_default().to_string())
    }

    /// Runs the chain, constraining the reply to the schema of `T`.
    pub async fn run_structured<T: StructuredResponse>(&self, input: &str) -> Result<T, PromptError> {
        let request = self
            .request(input)
            .with_response_schema(response_schema::<T>()?);
        execute_structured_request(self.ai_provider.as_ref(), &request).await
    }
}
