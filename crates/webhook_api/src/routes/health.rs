//! Service descriptor and liveness routes

use crate::api_handler::utc_timestamp;
use axum::response::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub health: String,
    pub version: String,
    pub timestamp: String,
}

/// Root endpoint - GET /
///
/// Static service descriptor listing the available endpoints.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "service": "N8N Domain Change Webhook API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /change-domain": "Change domain (IP allowlist required)",
            "GET /status": "Check status",
            "GET /health": "Health check"
        }
    }))
}

/// Health check endpoint - GET /health
///
/// Liveness probe; always 200 while the server is serving.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        health: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: utc_timestamp(),
    })
}
