use axum::{routing::get, Router};

use crate::{handlers, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::dashboard::stats))
        .route("/performance", get(handlers::dashboard::performance))
        .route("/activity", get(handlers::dashboard::activity))
}
