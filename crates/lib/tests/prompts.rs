//! # Prompt Template Tests
//!
//! This test suite validates the chat template helpers in `anyprompt::prompts::template`
//! and the single-step `PromptChain` built on top of them.

mod common;

use anyprompt::{
    prompts::{build_prompt, ChatPromptTemplate, PromptChain},
    schemas::{Sentiment, SentimentValues},
    ChatMessage, Role,
};
use common::{setup_tracing, ScriptedAiProvider};

/// Verifies that `build_prompt` produces a system message followed by the raw input.
#[test]
fn test_build_prompt_shape() {
    let template = build_prompt("You are a translator. Translate to French.");

    assert_eq!(
        template.messages(),
        &[
            (
                Role::System,
                "You are a translator. Translate to French.".to_string()
            ),
            (Role::User, "{input}".to_string()),
        ]
    );
}

/// Verifies that formatting substitutes the input in every message, including the system one.
#[test]
fn test_format_messages_substitutes_every_placeholder() {
    let template = ChatPromptTemplate::from_messages(vec![
        (Role::System, "Answer questions about: {input}"),
        (Role::User, "Tell me more about {input}."),
    ]);

    let messages = template.format_messages("rust");

    assert_eq!(
        messages,
        vec![
            ChatMessage::system("Answer questions about: rust"),
            ChatMessage::user("Tell me more about rust."),
        ]
    );
}

/// Verifies that a template without a placeholder is passed through unchanged.
#[test]
fn test_format_messages_without_placeholder() {
    let template = ChatPromptTemplate::from_messages(vec![(Role::System, "Static prompt")]);
    let request = template.to_request("ignored");

    assert_eq!(request.messages, vec![ChatMessage::system("Static prompt")]);
    assert!(request.model.is_none());
    assert!(request.response_schema.is_none());
}

/// Verifies that running a chain sends the formatted messages and returns the reply text.
#[tokio::test]
async fn test_prompt_chain_run() {
    setup_tracing();
    let provider = ScriptedAiProvider::new(vec!["Bonjour"]);
    let chain = PromptChain::new(build_prompt("Translate to French."), Box::new(provider.clone()))
        .with_model("gpt-4o-mini");

    let reply = chain.run("Hello").await.unwrap();

    assert_eq!(reply, "Bonjour");
    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(calls[0].system_prompt(), Some("Translate to French."));
    assert_eq!(calls[0].user_content(), Some("Hello"));
}

/// Verifies that a structured chain attaches the schema and parses the reply.
#[tokio::test]
async fn test_prompt_chain_run_structured() {
    setup_tracing();
    let provider = ScriptedAiProvider::new(vec![r#"{"sentiment": "Positive"}"#]);
    let chain = PromptChain::new(build_prompt("Classify the sentiment."), Box::new(provider.clone()));

    let sentiment: Sentiment = chain.run_structured("What a great day!").await.unwrap();

    assert_eq!(sentiment.sentiment, SentimentValues::Positive);
    let calls = provider.calls();
    let schema = calls[0].response_schema.as_ref().unwrap();
    assert_eq!(schema.name, "Sentiment");
}
