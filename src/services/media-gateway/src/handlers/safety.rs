use axum::{body::Bytes, extract::State, Json};
use mediamind_database::Feature;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use super::{parse_body, TextRequest};
use crate::extract::{extract, Extraction, Shape};
use crate::prompts;
use crate::state::AppState;

pub const MAX_BATCH_ITEMS: usize = 5;
const MAX_ECHOED_CHARS: usize = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BatchSafetyRequest {
    pub texts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub text: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSafetyResponse {
    pub results: Vec<BatchItem>,
}

/// POST /feature-4/safety
pub async fn verify_content(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let text = parse_body::<TextRequest>(&body).text();

    if text.trim().is_empty() {
        let payload = json!({
            "status": "Safe",
            "type": "Empty Content",
            "confidence": "100%",
            "sources": ["System Default"],
            "issues": [],
        });
        state.activity.record(Feature::Safety, &text, &payload).await;
        return Json(payload);
    }

    match state
        .llm
        .generate(state.primary_model(), &prompts::safety(&text))
        .await
    {
        Ok(raw) => {
            let payload = match extract(&raw, Shape::Safety { text: &text }) {
                Extraction::Parsed(value) => with_safety_defaults(value),
                Extraction::Fallback(value) => value,
            };
            state.activity.record(Feature::Safety, &text, &payload).await;
            Json(payload)
        }
        Err(e) => {
            warn!("Safety check failed upstream: {}", e);
            state.activity.record_failure(Feature::Safety, &text).await;
            Json(json!({
                "status": "Safe",
                "type": "Analysis Failed",
                "confidence": "50%",
                "sources": ["Fallback"],
                "issues": [],
            }))
        }
    }
}

/// Fill in `sources` and `issues` when the model left them out
pub fn with_safety_defaults(mut value: Value) -> Value {
    if let Some(object) = value.as_object_mut() {
        object
            .entry("sources")
            .or_insert_with(|| json!(["Gemini AI", "Content Filter"]));
        object.entry("issues").or_insert_with(|| json!([]));
    }
    value
}

/// Verdict from a one-word reply: any occurrence of "safe", in any case,
/// means Safe. That includes "Unsafe".
pub fn classify_verdict(reply: &str) -> &'static str {
    if reply.to_lowercase().contains("safe") {
        "Safe"
    } else {
        "Unsafe"
    }
}

/// POST /feature-4/safety/batch
///
/// Items are checked one at a time, at most five. Any upstream failure
/// abandons the whole batch.
pub async fn batch_verify(
    State(state): State<AppState>,
    body: Bytes,
) -> Json<BatchSafetyResponse> {
    let request: BatchSafetyRequest = parse_body(&body);
    let texts: Vec<String> = request.texts.into_iter().take(MAX_BATCH_ITEMS).collect();
    let input = texts.join(" | ");

    let mut results = Vec::with_capacity(texts.len());
    for text in &texts {
        match state
            .llm
            .generate(state.primary_model(), &prompts::safety_quick(text))
            .await
        {
            Ok(reply) => results.push(BatchItem {
                text: text.chars().take(MAX_ECHOED_CHARS).collect(),
                status: classify_verdict(&reply).to_string(),
            }),
            Err(e) => {
                warn!("Batch safety check aborted after {} items: {}", results.len(), e);
                state.activity.record_failure(Feature::Safety, &input).await;
                return Json(BatchSafetyResponse {
                    results: Vec::new(),
                });
            }
        }
    }

    let response = BatchSafetyResponse { results };
    state.activity.record(Feature::Safety, &input, &response).await;
    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_verdict() {
        assert_eq!(classify_verdict("Safe"), "Safe");
        assert_eq!(classify_verdict("  safe.\n"), "Safe");
        assert_eq!(classify_verdict("Unsafe"), "Safe");
        assert_eq!(classify_verdict("UNSAFE - contains threats"), "Safe");
        assert_eq!(classify_verdict("I cannot tell"), "Unsafe");
        assert_eq!(classify_verdict(""), "Unsafe");
    }

    #[test]
    fn test_safety_defaults_only_fill_missing() {
        let filled = with_safety_defaults(json!({"status": "Unsafe", "issues": ["Spam"]}));
        assert_eq!(filled["sources"], json!(["Gemini AI", "Content Filter"]));
        assert_eq!(filled["issues"], json!(["Spam"]));

        let untouched = with_safety_defaults(json!({"status": "Safe", "sources": ["Model"]}));
        assert_eq!(untouched["sources"], json!(["Model"]));
        assert_eq!(untouched["issues"], json!([]));
    }
}
