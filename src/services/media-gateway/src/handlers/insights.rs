use axum::{body::Bytes, extract::State, Json};
use mediamind_database::Feature;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::parse_body;
use crate::extract::{extract, insights_default, Extraction, Shape, DEFAULT_CHART_DATA};
use crate::prompts;
use crate::state::AppState;

pub const DEFAULT_TOPIC: &str = "Technology";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InsightsRequest {
    pub topic: Option<String>,
}

/// POST /feature-5/insights
pub async fn get_insights(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let request: InsightsRequest = parse_body(&body);
    let topic = request
        .topic
        .map(|topic| topic.trim().to_string())
        .filter(|topic| !topic.is_empty())
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

    match state
        .llm
        .generate(state.primary_model(), &prompts::insights(&topic))
        .await
    {
        Ok(raw) => {
            let payload = match extract(&raw, Shape::Insights) {
                Extraction::Parsed(value) => with_insight_defaults(value),
                Extraction::Fallback(value) => value,
            };
            state.activity.record(Feature::Insights, &topic, &payload).await;
            Json(payload)
        }
        Err(e) => {
            warn!("Insights for {} failed upstream: {}", topic, e);
            state.activity.record_failure(Feature::Insights, &topic).await;
            Json(insights_default())
        }
    }
}

/// Complete a parsed reply so it always has the full insights shape
pub fn with_insight_defaults(mut value: Value) -> Value {
    let defaults = insights_default();

    if let Some(object) = value.as_object_mut() {
        for key in ["trend_prediction", "volume", "sentiment_forecast"] {
            object
                .entry(key)
                .or_insert_with(|| defaults[key].clone());
        }
        object
            .entry("demographics")
            .or_insert_with(|| json!(["Gen Z", "Tech Professionals"]));
        object
            .entry("chart_data")
            .or_insert_with(|| json!(DEFAULT_CHART_DATA));
    }
    value
}
