//! Upstream language model access
//!
//! `LanguageModel` is the seam every feature handler talks through. The
//! production implementation is `GeminiClient`, which calls the Gemini
//! `generateContent` REST endpoint and classifies failures so the translation
//! retry policy can tell quota exhaustion apart from everything else.

use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;

/// Why an upstream call produced no text
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpstreamError {
    #[error("quota exhausted (suggested retry delay: {retry_after:?})")]
    QuotaExhausted { retry_after: Option<Duration> },

    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("upstream response contained no text")]
    EmptyResponse,

    #[error("no API credential configured")]
    MissingCredential,
}

impl UpstreamError {
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, UpstreamError::QuotaExhausted { .. })
    }

    /// Server-suggested delay, only present on quota exhaustion
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            UpstreamError::QuotaExhausted { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// A text-in, text-out generative model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one prompt to `model` and return the raw response text
    async fn generate(&self, model: &str, prompt: &str) -> std::result::Result<String, UpstreamError>;
}

// Gemini API types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl Default for GeminiGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

/// Gemini REST client. Holds the credential; constructed once at startup and
/// shared through the application state.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_url: String,
    generation_config: GeminiGenerationConfig,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.upstream_timeout()).build()?;

        Ok(Self::with_client(
            client,
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
        ))
    }

    pub fn with_client(client: Client, api_key: String, api_url: String) -> Self {
        Self {
            client,
            api_key,
            api_url,
            generation_config: GeminiGenerationConfig::default(),
        }
    }

    /// `models/` prefixes are accepted and normalized away
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            model.trim_start_matches("models/")
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> std::result::Result<String, UpstreamError> {
        if self.api_key.trim().is_empty() {
            return Err(UpstreamError::MissingCredential);
        }

        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: self.generation_config.clone(),
        };

        debug!("Calling Gemini model {}", model);

        let response = self
            .client
            .post(self.endpoint(model))
            .header("Content-Type", "application/json")
            .header("X-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout
                } else {
                    UpstreamError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let header_delay = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let error_text = response.text().await.unwrap_or_default();

            let error = classify_error(status, &error_text, header_delay);
            warn!("Gemini model {} failed: {}", model, error);
            return Err(error);
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        extract_text(&body)
    }
}

/// Map a non-success Gemini response onto `UpstreamError`
pub fn classify_error(
    status: StatusCode,
    body: &str,
    header_delay: Option<Duration>,
) -> UpstreamError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error_status = parsed
        .as_ref()
        .and_then(|v| v["error"]["status"].as_str())
        .unwrap_or_default();

    if status == StatusCode::TOO_MANY_REQUESTS || error_status == "RESOURCE_EXHAUSTED" {
        let retry_after = parsed.as_ref().and_then(retry_info_delay).or(header_delay);
        return UpstreamError::QuotaExhausted { retry_after };
    }

    let message = parsed
        .as_ref()
        .and_then(|v| v["error"]["message"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.chars().take(200).collect());

    UpstreamError::Status {
        status: status.as_u16(),
        message,
    }
}

/// `retryDelay` from a `google.rpc.RetryInfo` entry in `error.details`
fn retry_info_delay(body: &Value) -> Option<Duration> {
    body["error"]["details"]
        .as_array()?
        .iter()
        .filter(|detail| {
            detail["@type"]
                .as_str()
                .map_or(false, |t| t.ends_with("google.rpc.RetryInfo"))
        })
        .find_map(|detail| detail["retryDelay"].as_str())
        .and_then(parse_protobuf_duration)
}

/// Parse protobuf JSON durations such as `"45s"` or `"1.500s"`
pub fn parse_protobuf_duration(raw: &str) -> Option<Duration> {
    let seconds: f64 = raw.trim().strip_suffix('s')?.parse().ok()?;
    if seconds.is_finite() && seconds >= 0.0 {
        Some(Duration::from_secs_f64(seconds))
    } else {
        None
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(body: &str) -> std::result::Result<String, UpstreamError> {
    let response: GeminiResponse =
        serde_json::from_str(body).map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(UpstreamError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        debug!(
            "Gemini candidate had no text (finish reason: {:?})",
            candidate.finish_reason
        );
        return Err(UpstreamError::EmptyResponse);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_protobuf_duration() {
        assert_eq!(parse_protobuf_duration("45s"), Some(Duration::from_secs(45)));
        assert_eq!(
            parse_protobuf_duration("1.5s"),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(parse_protobuf_duration("45"), None);
        assert_eq!(parse_protobuf_duration("-3s"), None);
    }

    #[test]
    fn test_classify_quota_with_retry_info() {
        let body = r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED","message":"quota",
            "details":[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"45s"}]}}"#;

        let error = classify_error(StatusCode::TOO_MANY_REQUESTS, body, None);
        assert_eq!(
            error,
            UpstreamError::QuotaExhausted {
                retry_after: Some(Duration::from_secs(45))
            }
        );
    }

    #[test]
    fn test_classify_quota_falls_back_to_header() {
        let error = classify_error(
            StatusCode::TOO_MANY_REQUESTS,
            "rate limited",
            Some(Duration::from_secs(7)),
        );
        assert_eq!(error.retry_after(), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_classify_other_status() {
        let body = r#"{"error":{"code":400,"status":"INVALID_ARGUMENT","message":"bad model"}}"#;
        let error = classify_error(StatusCode::BAD_REQUEST, body, None);
        assert_eq!(
            error,
            UpstreamError::Status {
                status: 400,
                message: "bad model".to_string()
            }
        );
        assert!(!error.is_quota_exhausted());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]},"finishReason":"STOP"}]}"#;
        assert_eq!(extract_text(body).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_extract_text_blocked_candidate() {
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert_eq!(extract_text(body), Err(UpstreamError::EmptyResponse));
        assert_eq!(
            extract_text(r#"{"candidates":[]}"#),
            Err(UpstreamError::EmptyResponse)
        );
    }

    #[test]
    fn test_endpoint_normalizes_model_prefix() {
        let client = GeminiClient::with_client(
            Client::new(),
            "key".to_string(),
            "https://example.test/v1beta/".to_string(),
        );
        assert_eq!(
            client.endpoint("models/gemini-1.5-flash"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_credential_fails_fast() {
        let client =
            GeminiClient::with_client(Client::new(), String::new(), "http://127.0.0.1:9".into());
        assert_eq!(
            client.generate("gemini-2.5-flash", "hi").await,
            Err(UpstreamError::MissingCredential)
        );
    }
}
