//! MediaMind gateway library
//!
//! HTTP surface for the six Gemini-backed text features and the activity
//! dashboard. The binary in `main.rs` wires configuration, tracing and the
//! server around [`build_router`].

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod llm;
pub mod middleware_layer;
pub mod prompts;
pub mod retry;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{Config, RecommendMode};
pub use error::{AppError, Result};
pub use llm::{GeminiClient, LanguageModel, UpstreamError};
pub use state::AppState;

use axum::Router;

/// Build the application router with all middleware and routes
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use tower::ServiceBuilder;
    use tower_http::{cors::CorsLayer, trace::TraceLayer};

    Router::new()
        .merge(routes::public::router())
        .merge(routes::features::router())
        .nest("/dashboard", routes::dashboard::router())
        .fallback(handlers::health::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(
                    middleware_layer::logging::logging_middleware,
                )),
        )
        .with_state(state)
}
