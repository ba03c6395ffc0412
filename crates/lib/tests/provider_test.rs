//! # HTTP Provider Tests
//!
//! Exercises the OpenAI-compatible and Gemini providers, the embedding client and the
//! provider factory against a local `wiremock` server.

mod common;

use anyprompt::{
    providers::{
        ai::{
            gemini::GeminiProvider, openai::OpenAiProvider, AiProvider, ApiEmbeddingProvider,
            EmbeddingProvider,
        },
        factory::create_provider,
    },
    schemas::{Sentiment, SentimentValues},
    structured::build_structured_request,
    structured_query, CompletionRequest, ErrorKind, PromptError, ProviderConfig,
};
use common::setup_tracing;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn openai_reply(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4o-mini-2024-07-18",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

#[tokio::test]
async fn test_openai_structured_request_payload() {
    setup_tracing();
    // --- 1. Arrange ---
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.0,
            "stream": false,
            "messages": [
                {"role": "system", "content": "Classify the sentiment."},
                {"role": "user", "content": "Great product!"}
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {"name": "Sentiment", "strict": false}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_reply(
            r#"{"sentiment": "Positive"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(
        format!("{}/v1/chat/completions", server.uri()),
        Some("test-key".to_string()),
        None,
    )
    .unwrap();
    let request =
        build_structured_request::<Sentiment>("Classify the sentiment.", "Great product!", "gpt-4o-mini")
            .unwrap()
            .with_temperature(Some(0.0));

    // --- 2. Act ---
    let completion = provider.complete(&request).await.unwrap();

    // --- 3. Assert ---
    assert_eq!(completion.model.as_deref(), Some("gpt-4o-mini-2024-07-18"));
    assert_eq!(completion.content(), Some(r#"{"sentiment": "Positive"}"#));
}

#[tokio::test]
async fn test_openai_uses_provider_default_model() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"model": "local-llama"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_reply("pong")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(server.uri(), None, Some("local-llama".to_string())).unwrap();
    let reply = provider.generate("Answer briefly.", "ping").await.unwrap();

    assert_eq!(reply, "pong");
}

#[tokio::test]
async fn test_openai_auth_failure_is_transport_error() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(server.uri(), Some("bad".to_string()), None).unwrap();
    let err = provider
        .complete(&CompletionRequest::new("system", "user"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    match err {
        PromptError::AiApi { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid api key");
        }
        other => panic!("Expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_openai_malformed_envelope_is_transport_error() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(server.uri(), None, None).unwrap();
    let err = provider
        .complete(&CompletionRequest::new("system", "user"))
        .await
        .unwrap_err();

    assert!(matches!(err, PromptError::AiDeserialization(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_structured_query_over_http_returns_validation_error() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(openai_reply(r#"{"sentiment": "Ecstatic"}"#)),
        )
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(server.uri(), None, None).unwrap();
    let err = structured_query::<Sentiment>(&provider, "Classify.", "Wow", "gpt-4o")
        .await
        .unwrap_err();

    assert!(err.is_validation());
}

#[tokio::test]
async fn test_gemini_structured_request_payload() {
    setup_tracing();
    // --- 1. Arrange ---
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "gemini-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "Meh."}]}],
            "generationConfig": {"maxOutputTokens": 32, "responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"sentiment\": "}, {"text": "\"Neutral\"}"}]}}
            ],
            "modelVersion": "gemini-2.0-flash-001"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(
        format!("{}/v1beta/models/gemini-2.0-flash:generateContent", server.uri()),
        "gemini-key".to_string(),
    )
    .unwrap();
    let request = build_structured_request::<Sentiment>("Classify the sentiment.", "Meh.", "gemini-2.0-flash")
        .unwrap()
        .with_max_tokens(Some(32));

    // --- 2. Act ---
    let completion = provider.complete(&request).await.unwrap();

    // --- 3. Assert ---
    assert_eq!(completion.model.as_deref(), Some("gemini-2.0-flash-001"));
    let sentiment: Sentiment =
        anyprompt::structured::parse_structured_response(completion.content().unwrap()).unwrap();
    assert_eq!(sentiment.sentiment, SentimentValues::Neutral);

    // The schema travels in the system instruction.
    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    let instruction = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
    assert!(instruction.starts_with("Classify the sentiment."));
    assert!(instruction.contains("`Sentiment`"));
}

#[tokio::test]
async fn test_gemini_server_error_is_transport_error() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(server.uri(), "key".to_string()).unwrap();
    let err = provider.generate("system", "user").await.unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test]
async fn test_openai_compatible_embedding() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer embed-key"))
        .and(body_partial_json(json!({"model": "text-embedding-3-small", "input": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [0.1, 0.2, 0.3], "index": 0}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = ApiEmbeddingProvider::new(
        format!("{}/v1/embeddings", server.uri()),
        "text-embedding-3-small".to_string(),
        Some("embed-key".to_string()),
    )
    .unwrap();

    let vector = embedder.embed("hello").await.unwrap();

    assert_eq!(embedder.model_name(), "text-embedding-3-small");
    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn test_embedding_error_status() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let embedder = ApiEmbeddingProvider::new(server.uri(), "m".to_string(), None).unwrap();
    let err = embedder.embed("hello").await.unwrap_err();

    assert!(matches!(err, PromptError::AiApi { status: 500, .. }));
}

#[tokio::test]
async fn test_embedding_reply_without_data_is_not_a_transport_error() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = ApiEmbeddingProvider::new(server.uri(), "m".to_string(), None).unwrap();
    let err = embedder.embed("hello").await.unwrap_err();

    assert!(!err.is_transport());
    assert!(err.is_validation());
    assert!(!matches!(err, PromptError::AiApi { .. }));
}

#[tokio::test]
async fn test_embedding_provider_reuses_client_across_calls() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [1.0, 0.0], "index": 0}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let embedder = ApiEmbeddingProvider::new(
        format!("{}/v1/embeddings", server.uri()),
        "m".to_string(),
        None,
    )
    .unwrap();
    let cloned = embedder.clone();

    assert_eq!(embedder.embed("one").await.unwrap(), vec![1.0, 0.0]);
    assert_eq!(cloned.embed("two").await.unwrap(), vec![1.0, 0.0]);
}

// --- Factory ---

fn config(provider: &str, api_url: Option<&str>, api_key: Option<&str>) -> ProviderConfig {
    ProviderConfig {
        provider: provider.to_string(),
        api_url: api_url.map(String::from),
        api_key: api_key.map(String::from),
        model_name: "some-model".to_string(),
    }
}

#[test]
fn test_factory_builds_known_providers() {
    assert!(create_provider(&config("openai", None, Some("k"))).is_ok());
    assert!(create_provider(&config("local", Some("http://localhost:8080"), None)).is_ok());
    assert!(create_provider(&config("gemini", None, Some("k"))).is_ok());
}

#[test]
fn test_factory_configuration_errors() {
    let err = create_provider(&config("openai", None, None)).unwrap_err();
    assert!(matches!(err, PromptError::MissingApiKey));

    // A blank key counts as missing.
    let err = create_provider(&config("gemini", None, Some("  "))).unwrap_err();
    assert!(matches!(err, PromptError::MissingApiKey));

    let err = create_provider(&config("local", None, None)).unwrap_err();
    assert!(matches!(err, PromptError::MissingAiProvider(_)));

    let err = create_provider(&config("anthropic", None, Some("k"))).unwrap_err();
    assert!(matches!(err, PromptError::UnsupportedProvider(ref name) if name == "anthropic"));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_factory_local_provider_talks_to_server() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"model": "some-model"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_reply("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&config("local", Some(&server.uri()), None)).unwrap();
    assert_eq!(provider.generate("s", "u").await.unwrap(), "ok");
}
