use crate::{
    errors::PromptError,
    providers::ai::AiProvider,
    types::{ChatMessage, Completion, CompletionRequest, ResponseSchema},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use tracing::debug;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAiResponseFormat<'a>>,
    stream: bool,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OpenAiResponseFormat<'a> {
    JsonSchema { json_schema: OpenAiJsonSchema<'a> },
}

#[derive(Serialize)]
struct OpenAiJsonSchema<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    schema: &'a Value,
    strict: bool,
}

impl<'a> From<&'a ResponseSchema> for OpenAiResponseFormat<'a> {
    fn from(schema: &'a ResponseSchema) -> Self {
        OpenAiResponseFormat::JsonSchema {
            json_schema: OpenAiJsonSchema {
                name: &schema.name,
                description: schema.description.as_deref(),
                schema: &schema.schema,
                // Strict mode requires every property to be listed as required,
                // which optional fields in our schemas are not.
                strict: false,
            },
        }
    }
}

#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize, Debug)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

// --- OpenAI Provider implementation ---

/// A provider for interacting with OpenAI or any OpenAI-compatible API
/// (including local servers).
#[derive(Clone, Debug)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider`.
    ///
    /// `model` is used for requests that do not name a model themselves.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Result<Self, PromptError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, PromptError> {
        let request_body = OpenAiRequest {
            messages: &request.messages,
            model: request.model.as_deref().or(self.model.as_deref()),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.response_schema.as_ref().map(Into::into),
            stream: false,
        };

        let mut request_builder = self.client.post(&self.api_url);

        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        debug!(api_url = %self.api_url, model = ?request_body.model, "--> Sending chat completion request");

        let response = request_builder
            .json(&request_body)
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

        let openai_response: OpenAiResponse = response
            .json()
            .await
            .map_err(PromptError::AiDeserialization)?;

        debug!("<-- Received {} choice(s)", openai_response.choices.len());

        Ok(Completion {
            model: openai_response.model,
            choices: openai_response
                .choices
                .into_iter()
                .map(|c| c.message.content.unwrap_or_default())
                .collect(),
        })
    }
}
