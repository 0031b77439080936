use axum::{body::Bytes, extract::State, Json};
use mediamind_database::Feature;
use serde_json::{json, Value};
use tracing::warn;

use super::{parse_body, TextRequest};
use crate::extract::{extract, Shape};
use crate::prompts;
use crate::state::AppState;

/// POST /feature-1/sentiment
pub async fn analyze_sentiment(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let text = parse_body::<TextRequest>(&body).text();

    if text.trim().is_empty() {
        let payload = json!({ "sentiment": "Neutral", "confidence": "0%", "tone": "Neutral" });
        state.activity.record(Feature::Sentiment, &text, &payload).await;
        return Json(payload);
    }

    match state
        .llm
        .generate(state.primary_model(), &prompts::sentiment(&text))
        .await
    {
        Ok(raw) => {
            let payload = extract(&raw, Shape::Sentiment { text: &text }).into_value();
            state.activity.record(Feature::Sentiment, &text, &payload).await;
            Json(payload)
        }
        Err(e) => {
            warn!("Sentiment analysis failed upstream: {}", e);
            state.activity.record_failure(Feature::Sentiment, &text).await;
            Json(json!({ "sentiment": "Neutral", "confidence": "50%", "tone": "Unknown" }))
        }
    }
}
