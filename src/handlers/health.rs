//! Health check handlers
//!
//! Provides service status and request budget endpoints

use crate::handlers::AppState;
use crate::services::BudgetSnapshot;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    pub message: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// Provider used when a request names none
    pub default_provider: String,
    /// Upstream calls made so far
    pub requests: BudgetSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<u64>,
}

/// Basic health check
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing health check");

    Json(build_response(&state, "ok", "Flight search proxy is running", None))
}

/// Liveness check
///
/// GET /health/live
/// Does not touch any upstream
pub async fn liveness_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing liveness check");

    let uptime = state.started_at.elapsed().as_secs();
    Json(build_response(&state, "alive", "Service is alive", Some(uptime)))
}

/// Upstream request counter
///
/// GET /api/request-count
pub async fn request_count(State(state): State<Arc<AppState>>) -> Json<BudgetSnapshot> {
    Json(state.budget.snapshot())
}

fn build_response(state: &AppState, status: &str, message: &str, uptime_seconds: Option<u64>) -> HealthResponse {
    HealthResponse {
        status: status.to_string(),
        message: message.to_string(),
        service: crate::NAME.to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        default_provider: state.adapter.default_provider().to_string(),
        requests: state.budget.snapshot(),
        uptime_seconds,
    }
}
