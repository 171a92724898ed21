//! Health check handlers
//!
//! Besides liveness, the health check reports where request lines are going.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{middleware::OutputMode, state::AppState};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Destination of request lines: `terminal` or `syslog`
    pub output: &'static str,
    /// Process name stamped on syslog messages, absent in terminal mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syslog_process: Option<String>,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let mode = state.logger().mode();
    let syslog_process = match mode {
        OutputMode::Syslog => Some(state.config().logger.syslog_process.clone()),
        OutputMode::Terminal => None,
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        output: mode.as_str(),
        syslog_process,
    })
}

/// Health routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
