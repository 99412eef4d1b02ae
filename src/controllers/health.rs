use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::config::Config;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Reports how synthesis is configured. Never includes the credential.
pub async fn health_ready(State(config): State<Arc<Config>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "provider": "configured",
            "submission_mode": config.submission_mode.as_str(),
            "poll_interval_ms": config.poll_interval_ms,
            "poll_max_attempts": config.poll_max_attempts,
            "poll_budget_secs": config.poll_budget().as_secs(),
        })),
    )
}
