//! `GeminiClient` against a mock Gemini server

use pretty_assertions::assert_eq;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use media_gateway::llm::{GeminiClient, LanguageModel, UpstreamError};

const ENDPOINT: &str = "/models/gemini-2.5-flash:generateContent";

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::with_client(Client::new(), "test-key".to_string(), server.uri())
}

#[tokio::test]
async fn test_generate_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("X-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "Say hi"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Hi there"}], "role": "model"},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server)
        .generate("gemini-2.5-flash", "Say hi")
        .await
        .unwrap();

    assert_eq!(text, "Hi there");
}

#[tokio::test]
async fn test_quota_exhaustion_reads_retry_info() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED",
                "details": [
                    {"@type": "type.googleapis.com/google.rpc.QuotaFailure"},
                    {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "45s"}
                ]
            }
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .generate("gemini-2.5-flash", "translate")
        .await
        .unwrap_err();

    assert_eq!(
        error,
        UpstreamError::QuotaExhausted {
            retry_after: Some(Duration::from_secs(45))
        }
    );
}

#[tokio::test]
async fn test_quota_exhaustion_uses_retry_after_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "7")
                .set_body_string("slow down"),
        )
        .mount(&server)
        .await;

    let error = client_for(&server)
        .generate("gemini-2.5-flash", "p")
        .await
        .unwrap_err();

    assert!(error.is_quota_exhausted());
    assert_eq!(error.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": 500, "message": "Internal error", "status": "INTERNAL"}
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .generate("models/gemini-2.5-flash", "p")
        .await
        .unwrap_err();

    assert_eq!(
        error,
        UpstreamError::Status {
            status: 500,
            message: "Internal error".to_string()
        }
    );
}

#[tokio::test]
async fn test_unparseable_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .generate("gemini-2.5-flash", "p")
        .await
        .unwrap_err();

    assert!(matches!(error, UpstreamError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(json!({"candidates": []})),
        )
        .mount(&server)
        .await;

    let client = Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let gemini = GeminiClient::with_client(client, "test-key".to_string(), server.uri());

    assert_eq!(
        gemini.generate("gemini-2.5-flash", "p").await,
        Err(UpstreamError::Timeout)
    );
}
