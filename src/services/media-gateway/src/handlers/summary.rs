use axum::{body::Bytes, extract::State, Json};
use mediamind_database::Feature;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{parse_body, TextRequest};
use crate::prompts;
use crate::state::AppState;

/// Inputs shorter than this are returned as their own summary
pub const MIN_SUMMARY_INPUT_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub compression_ratio: String,
}

/// Summary length over input length in characters, as a percentage with one
/// decimal
pub fn compression_ratio(summary: &str, input: &str) -> String {
    let input_chars = input.chars().count();
    if input_chars == 0 {
        return "0%".to_string();
    }
    let ratio = summary.chars().count() as f64 / input_chars as f64 * 100.0;
    format!("{:.1}%", ratio)
}

/// POST /feature-6/summary
pub async fn summarize_text(State(state): State<AppState>, body: Bytes) -> Json<SummaryResponse> {
    let text = parse_body::<TextRequest>(&body).text();

    if text.trim().is_empty() {
        let response = SummaryResponse {
            summary: String::new(),
            compression_ratio: "0%".to_string(),
        };
        state.activity.record(Feature::Summary, &text, &response).await;
        return Json(response);
    }

    if text.chars().count() < MIN_SUMMARY_INPUT_CHARS {
        let response = SummaryResponse {
            summary: text.clone(),
            compression_ratio: compression_ratio(&text, &text),
        };
        state.activity.record(Feature::Summary, &text, &response).await;
        return Json(response);
    }

    match state
        .llm
        .generate(state.primary_model(), &prompts::summary(&text))
        .await
    {
        Ok(raw) => {
            let summary = raw.trim().to_string();
            let response = SummaryResponse {
                compression_ratio: compression_ratio(&summary, &text),
                summary,
            };
            state.activity.record(Feature::Summary, &text, &response).await;
            Json(response)
        }
        Err(e) => {
            warn!("Summarization failed upstream: {}", e);
            state.activity.record_failure(Feature::Summary, &text).await;
            Json(SummaryResponse {
                summary: "Summary generation failed".to_string(),
                compression_ratio: "0%".to_string(),
            })
        }
    }
}
