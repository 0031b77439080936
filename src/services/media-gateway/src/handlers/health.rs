//! Status and readiness handlers

use axum::{extract::State, http::StatusCode, Json};
use mediamind_database::DatabaseHealth;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "status": "MediaMind Backend Running" }))
}

fn ready(feature: &str) -> Json<Value> {
    Json(json!({ "message": format!("{} Ready", feature) }))
}

pub async fn sentiment_ready() -> Json<Value> {
    ready("Sentiment Analysis")
}

pub async fn recommend_ready() -> Json<Value> {
    ready("Recommendation Engine")
}

pub async fn translate_ready() -> Json<Value> {
    ready("Translation")
}

pub async fn safety_ready() -> Json<Value> {
    ready("Safety Shield")
}

pub async fn insights_ready() -> Json<Value> {
    ready("Insights Analysis")
}

pub async fn summary_ready() -> Json<Value> {
    ready("Summarization")
}

/// GET /health
///
/// Probes the activity log store; 503 when it cannot be reached.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<DatabaseHealth>) {
    let health = state.database.health_checker().check().await;
    let status = if health.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}

/// Fallback for unmatched routes
pub async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
