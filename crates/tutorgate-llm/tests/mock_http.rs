//! Mock HTTP server tests for [`OllamaClient`].
//!
//! Uses [`wiremock`] to stand up a local HTTP server that emulates the
//! Ollama API. This exercises the full request/response path without a
//! real backend.
//!
//! Coverage:
//! - Successful single-shot generation, with options forwarded
//! - 404 model not found
//! - 500 internal server error
//! - Malformed JSON response
//! - Streaming chat: fragment ordering, completion marker, in-band error
//! - Model listing

use tokio::sync::mpsc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tutorgate_llm::backend::GenerationBackend;
use tutorgate_llm::config::OllamaConfig;
use tutorgate_llm::error::BackendError;
use tutorgate_llm::ollama::OllamaClient;
use tutorgate_llm::types::{GenerateOptions, GenerateRequest};
use tutorgate_types::ChatMessage;

/// Build a client pointing at the given mock server URL.
fn mock_client(server_url: &str) -> OllamaClient {
    OllamaClient::new(OllamaConfig {
        base_url: server_url.into(),
        timeout_secs: 5,
    })
}

/// Collect every fragment from a chat stream along with its outcome.
async fn run_chat(
    client: &OllamaClient,
    model: &str,
) -> (Vec<String>, Result<(), BackendError>) {
    let messages = vec![ChatMessage::user("Hello")];
    let (tx, mut rx) = mpsc::channel(32);

    let result = client.chat_stream(model, &messages, tx).await;

    let mut fragments = Vec::new();
    while let Some(fragment) = rx.recv().await {
        fragments.push(fragment);
    }
    (fragments, result)
}

// ── Single-shot generation ─────────────────────────────────────────────

#[tokio::test]
async fn generate_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3:8b",
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "llama3:8b",
            "response": "Paris is the capital of France.",
            "done": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server.uri());
    let request = GenerateRequest::new("llama3:8b", "What is the capital of France?");

    let text = client.generate(&request).await.unwrap();
    assert_eq!(text, "Paris is the capital of France.");
}

#[tokio::test]
async fn generate_forwards_options() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "options": {
                "num_predict": 100,
                "temperature": 0.1,
                "top_p": 0.95,
                "top_k": 50,
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "ok",
            "done": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server.uri());
    let request = GenerateRequest::new("llama3:8b", "classify this").with_options(GenerateOptions {
        num_predict: Some(100),
        temperature: Some(0.1),
        top_p: Some(0.95),
        top_k: Some(50),
        ..GenerateOptions::default()
    });

    client.generate(&request).await.unwrap();
}

#[tokio::test]
async fn generate_model_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"error": "model 'llama9' not found"})),
        )
        .mount(&server)
        .await;

    let client = mock_client(&server.uri());
    let err = client
        .generate(&GenerateRequest::new("llama9", "hi"))
        .await
        .unwrap_err();

    match err {
        BackendError::ModelNotFound(message) => {
            assert!(message.contains("llama9"), "got: {message}");
        }
        other => panic!("expected ModelNotFound, got: {other}"),
    }
}

#[tokio::test]
async fn generate_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let client = mock_client(&server.uri());
    let err = client
        .generate(&GenerateRequest::new("llama3", "hi"))
        .await
        .unwrap_err();

    match err {
        BackendError::RequestFailed(message) => {
            assert!(message.contains("500"), "got: {message}");
            assert!(message.contains("backend exploded"), "got: {message}");
        }
        other => panic!("expected RequestFailed, got: {other}"),
    }
}

#[tokio::test]
async fn generate_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = mock_client(&server.uri());
    let err = client
        .generate(&GenerateRequest::new("llama3", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::InvalidResponse(_)));
}

// ── Streaming chat ─────────────────────────────────────────────────────

#[tokio::test]
async fn chat_stream_fragments_in_order() {
    let server = MockServer::start().await;

    let body = concat!(
        "{\"message\":{\"role\":\"assistant\",\"content\":\"Hel\"},\"done\":false}\n",
        "{\"message\":{\"role\":\"assistant\",\"content\":\"lo\"},\"done\":false}\n",
        "{\"message\":{\"role\":\"assistant\",\"content\":\" there\"},\"done\":false}\n",
        "{\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true}\n",
    );

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = mock_client(&server.uri());
    let (fragments, result) = run_chat(&client, "llama3").await;

    result.unwrap();
    assert_eq!(fragments, vec!["Hel", "lo", " there"]);
}

#[tokio::test]
async fn chat_stream_in_band_error() {
    let server = MockServer::start().await;

    let body = concat!(
        "{\"message\":{\"role\":\"assistant\",\"content\":\"par\"},\"done\":false}\n",
        "{\"error\":\"model runner stopped\"}\n",
    );

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = mock_client(&server.uri());
    let (fragments, result) = run_chat(&client, "llama3").await;

    // Fragments produced before the failure are still delivered.
    assert_eq!(fragments, vec!["par"]);
    match result.unwrap_err() {
        BackendError::Stream(message) => assert_eq!(message, "model runner stopped"),
        other => panic!("expected Stream error, got: {other}"),
    }
}

#[tokio::test]
async fn chat_stream_http_error_before_stream() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such model"))
        .mount(&server)
        .await;

    let client = mock_client(&server.uri());
    let (fragments, result) = run_chat(&client, "missing-model").await;

    assert!(fragments.is_empty());
    assert!(matches!(result, Err(BackendError::ModelNotFound(_))));
}

#[tokio::test]
async fn chat_stream_skips_garbage_lines() {
    let server = MockServer::start().await;

    let body = concat!(
        "{\"message\":{\"role\":\"assistant\",\"content\":\"ok\"},\"done\":false}\n",
        "{garbage\n",
        "{\"message\":{\"role\":\"assistant\",\"content\":\"!\"},\"done\":true}\n",
    );

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = mock_client(&server.uri());
    let (fragments, result) = run_chat(&client, "llama3").await;

    result.unwrap();
    assert_eq!(fragments, vec!["ok", "!"]);
}

// ── Model listing ──────────────────────────────────────────────────────

#[tokio::test]
async fn list_models_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [
                {"name": "llama3:8b", "size": 4661224676u64},
                {"name": "llama3:70b", "size": 39969745408u64},
            ]
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server.uri());
    let models = client.list_models().await.unwrap();

    let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["llama3:8b", "llama3:70b"]);
}

#[tokio::test]
async fn list_models_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let client = mock_client(&server.uri());
    assert!(matches!(
        client.list_models().await,
        Err(BackendError::RequestFailed(_))
    ));
}
