//! Wire-level tests for the OpenAI-compatible backend and the features
//! built on it, run against a local mock server.

#![cfg(feature = "openai")]

use std::time::Duration;

use notewise_core::{ContentFormat, Error, GenerationBackend, RewriteService, TaskType, TextEnhancer};
use notewise_inference::openai::{OpenAIBackend, OpenAIConfig};
use notewise_inference::{extract_tasks, EnhancementRewriter, ModelRoles};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_response(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "model": "test-gen",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

fn backend_for(server: &MockServer) -> OpenAIBackend {
    let config = OpenAIConfig {
        base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        gen_model: "test-gen".to_string(),
        timeout_seconds: 5,
        ..Default::default()
    };
    OpenAIBackend::new(config).expect("Failed to create backend")
}

#[tokio::test]
async fn test_generate_sends_auth_and_model() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "model": "test-gen",
            "messages": [{"role": "user", "content": "test prompt"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("Test response")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let result = backend.generate("test prompt").await;

    assert!(result.is_ok(), "Request should succeed: {:?}", result.err());
    assert_eq!(result.unwrap(), "Test response");
}

#[tokio::test]
async fn test_openrouter_headers_sent_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("HTTP-Referer", "https://example.org"))
        .and(header("X-Title", "Test Application"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = OpenAIConfig {
        base_url: mock_server.uri(),
        http_referer: Some("https://example.org".to_string()),
        x_title: Some("Test Application".to_string()),
        ..Default::default()
    };
    let backend = OpenAIBackend::new(config).expect("Failed to create backend");

    assert_eq!(backend.generate("hi").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_authentication_failure_maps_to_config_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error", "code": "invalid_api_key"}
        })))
        .mount(&mock_server)
        .await;

    let err = backend_for(&mock_server).generate("hi").await.unwrap_err();
    match err {
        Error::Config(msg) => assert!(msg.contains("Incorrect API key provided")),
        other => panic!("expected Config error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_with_unreadable_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    let err = backend_for(&mock_server).generate("hi").await.unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
    assert!(err.to_string().contains("Server error"));
}

#[tokio::test]
async fn test_empty_choices_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x", "choices": []})))
        .mount(&mock_server)
        .await;

    let err = backend_for(&mock_server).generate("hi").await.unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_response("late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = OpenAIConfig {
        base_url: mock_server.uri(),
        timeout_seconds: 1,
        ..Default::default()
    };
    let backend = OpenAIBackend::new(config).unwrap();

    let err = backend.generate("hi").await.unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
    assert!(err.to_string().contains("timed out"), "{}", err);
}

#[tokio::test]
async fn test_rewriter_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"model": "gpt-4o-mini", "temperature": 0.3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("Hello, world.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let rewriter = EnhancementRewriter::new(backend_for(&mock_server), ModelRoles::default());
    assert_eq!(rewriter.rewrite("hello world").await.unwrap(), "Hello, world.");

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "hello world");
    assert!(body.get("response_format").is_none());
}

#[tokio::test]
async fn test_enhancer_round_trip_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_response("Shopping list:\nBuy milk\n")),
        )
        .mount(&mock_server)
        .await;

    let enhancer = TextEnhancer::new(EnhancementRewriter::new(
        backend_for(&mock_server),
        ModelRoles::default(),
    ));
    let content = json!({"ops": [
        {"insert": "shopping list:"},
        {"insert": "\n"},
        {"insert": "buy milk"},
        {"insert": "\n", "attributes": {"list": "bullet"}}
    ]});

    let result = enhancer.enhance(&content, ContentFormat::Delta).await.unwrap();
    assert_eq!(
        serde_json::to_value(&result.enhanced).unwrap(),
        json!({"ops": [
            {"insert": "Shopping list:"},
            {"insert": "\n"},
            {"insert": "Buy milk"},
            {"insert": "\n", "attributes": {"list": "bullet"}}
        ]})
    );
}

#[tokio::test]
async fn test_enhancer_reports_provider_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "boom", "type": "server_error"}
        })))
        .mount(&mock_server)
        .await;

    let enhancer = TextEnhancer::new(EnhancementRewriter::new(
        backend_for(&mock_server),
        ModelRoles::default(),
    ));
    let err = enhancer
        .enhance(&json!("fix me"), ContentFormat::Plain)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RewriteService(_)));
}

#[tokio::test]
async fn test_extract_tasks_uses_json_mode_and_task_model() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(
            r#"{"tasks": [{"title": "Email Ana", "type": "email", "details": {}, "people": ["Ana"]}]}"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tasks = extract_tasks(
        &backend_for(&mock_server),
        &ModelRoles::default(),
        "remember to email Ana",
    )
    .await
    .unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task_type, TaskType::Email);
    assert_eq!(tasks[0].people, vec!["Ana"]);
}
