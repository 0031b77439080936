//! The six feature endpoints and their readiness probes

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feature-1", get(handlers::health::sentiment_ready))
        .route(
            "/feature-1/sentiment",
            post(handlers::sentiment::analyze_sentiment),
        )
        .route("/feature-2", get(handlers::health::recommend_ready))
        .route("/feature-2/recommend", post(handlers::recommend::recommend))
        .route("/feature-3", get(handlers::health::translate_ready))
        .route("/feature-3/translate", post(handlers::translate::translate))
        .route("/feature-4", get(handlers::health::safety_ready))
        .route("/feature-4/safety", post(handlers::safety::verify_content))
        .route(
            "/feature-4/safety/batch",
            post(handlers::safety::batch_verify),
        )
        .route("/feature-5", get(handlers::health::insights_ready))
        .route("/feature-5/insights", post(handlers::insights::get_insights))
        .route("/feature-6", get(handlers::health::summary_ready))
        .route("/feature-6/summary", post(handlers::summary::summarize_text))
}
