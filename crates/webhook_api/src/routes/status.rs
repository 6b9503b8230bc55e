//! Installation status route
//!
//! Composes a best-effort snapshot from three collaborators. Each failure
//! is replaced with a fallback value; this endpoint reports, it never
//! fails a request over a collaborator being unavailable.

use crate::{api_handler::utc_timestamp, AppState};
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Status snapshot response
#[derive(Serialize)]
pub struct StatusResponse {
    /// `running` or `stopped`, from the installation probe
    pub status: String,
    pub version: String,
    pub server_ip: String,
    pub current_domain: String,
    pub timestamp: String,
}

/// Status endpoint - GET /status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let current_domain = state.environment.current_domain().unwrap_or_else(|err| {
        debug!(error = %err, "current domain unavailable, reporting localhost");
        "localhost".to_string()
    });

    let server_ip = state.ip_lookup.lookup().await.unwrap_or_else(|err| {
        debug!(error = %err, "server IP unavailable, reporting loopback");
        "127.0.0.1".to_string()
    });

    let status = if state.probe.is_running().await {
        "running"
    } else {
        "stopped"
    };

    Json(StatusResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        server_ip,
        current_domain,
        timestamp: utc_timestamp(),
    })
}
