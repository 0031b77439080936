//! Dashboard read endpoints

use axum::{extract::State, Json};

use crate::services::dashboard::{ActivityItem, DashboardStats, FeatureUsage};
use crate::state::AppState;

/// GET /dashboard/stats
pub async fn stats(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.dashboard.stats().await)
}

/// GET /dashboard/performance
pub async fn performance(State(state): State<AppState>) -> Json<Vec<FeatureUsage>> {
    Json(state.dashboard.performance().await)
}

/// GET /dashboard/activity
pub async fn activity(State(state): State<AppState>) -> Json<Vec<ActivityItem>> {
    Json(state.dashboard.activity().await)
}
