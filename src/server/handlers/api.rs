//! Health and statistics endpoints.

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use super::super::stats::StatsReport;
use super::super::AppState;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Request counters since the process started.
pub async fn stats(State(state): State<AppState>) -> Json<StatsReport> {
    Json(state.stats.report())
}
