use thiserror::Error;

/// Custom error types for the application.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error (status {status}): {message}")]
    AiApi { status: u16, message: String },
    #[error("Response does not conform to schema `{schema}`: {reason}")]
    Validation { schema: String, reason: String },
    #[error("API key is missing")]
    MissingApiKey,
    #[error("AI provider is not configured: {0}")]
    MissingAiProvider(String),
    #[error("Unsupported AI provider: {0}")]
    UnsupportedProvider(String),
    #[error("Failed to generate JSON schema: {0}")]
    SchemaGeneration(#[from] serde_json::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// The broad failure class of a [`PromptError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The service was unreachable, rejected the credentials, rate limited the call,
    /// or answered with something that is not its own response envelope.
    Transport,
    /// The reply could not be coerced into the requested schema.
    Validation,
    /// The client or provider was set up incorrectly.
    Configuration,
}

impl PromptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PromptError::AiRequest(_)
            | PromptError::AiApi { .. }
            | PromptError::AiDeserialization(_) => ErrorKind::Transport,
            PromptError::Validation { .. } => ErrorKind::Validation,
            PromptError::ReqwestClientBuild(_)
            | PromptError::MissingApiKey
            | PromptError::MissingAiProvider(_)
            | PromptError::UnsupportedProvider(_)
            | PromptError::SchemaGeneration(_)
            | PromptError::Regex(_) => ErrorKind::Configuration,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub(crate) fn validation(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        PromptError::Validation {
            schema: schema.into(),
            reason: reason.into(),
        }
    }
}
