//! Integration tests for the chat-completions adapter.
//!
//! Runs the client against a local mock server and checks the request shape
//! and the mapping of every failure mode onto `ProviderError`.

use redpen_core::provider::{OpenAiClient, ProviderConfig, DEFAULT_MODEL};
use redpen_core::{Level, ProviderError};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(ProviderConfig {
        base_url: format!("{}/v1", server.uri()),
        ..ProviderConfig::default()
    })
    .unwrap()
}

fn completion(content: Value, finish_reason: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "choices": [{
            "index": 0,
            "finish_reason": finish_reason,
            "message": { "role": "assistant", "content": content }
        }]
    })
}

#[tokio::test]
async fn analyze_sends_json_mode_request_and_decodes_suggestions() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let content = json!({
        "suggestions": [
            { "level": 1, "original": "This are", "replacement": "This is", "reason": "agreement" },
            { "level": 3, "original": "a test", "reason": "too vague" }
        ]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": DEFAULT_MODEL,
            "response_format": { "type": "json_object" },
            "max_tokens": 10000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(Value::String(content), "stop")))
        .expect(1)
        .mount(&server)
        .await;

    let drafts = client_for(&server).analyze("This are a test.", "sk-test").await.unwrap();

    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].level, Level::Grammar);
    assert_eq!(drafts[0].original, "This are");
    assert_eq!(drafts[1].level, Level::Content);
    assert_eq!(drafts[1].replacement, None);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "This are a test.");
}

#[tokio::test]
async fn http_error_surfaces_api_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": { "message": "Incorrect API key provided" } })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).analyze("text", "bad-key").await.unwrap_err();
    match err {
        ProviderError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn truncated_response_is_distinct() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(Value::String("{\"suggestions\": [".into()), "length")),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).analyze("text", "sk-test").await.unwrap_err();
    assert!(matches!(err, ProviderError::Truncated), "got {err:?}");
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).analyze("text", "sk-test").await.unwrap_err();
    assert!(matches!(err, ProviderError::Malformed(_)), "got {err:?}");
}

#[tokio::test]
async fn blank_key_fails_before_any_request() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).analyze("text", "  ").await.unwrap_err();
    assert!(matches!(err, ProviderError::MissingApiKey));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    // Port 9 (discard) on localhost is expected to refuse connections.
    let client = OpenAiClient::new(ProviderConfig {
        base_url: "http://127.0.0.1:9/v1".to_owned(),
        ..ProviderConfig::default()
    })
    .unwrap();
    let err = client.analyze("text", "sk-test").await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn stalled_server_times_out_as_transport_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(Value::String("{\"suggestions\": []}".into()), "stop"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = OpenAiClient::new(ProviderConfig {
        base_url: format!("{}/v1", server.uri()),
        timeout_secs: 1,
        ..ProviderConfig::default()
    })
    .unwrap();

    let started = std::time::Instant::now();
    let err = client.analyze("text", "sk-test").await.unwrap_err();
    match err {
        ProviderError::Transport(e) => assert!(e.is_timeout(), "got {e:?}"),
        other => panic!("expected transport timeout, got {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(4));
}
