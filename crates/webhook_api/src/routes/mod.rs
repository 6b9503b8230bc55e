//! API Routes Module
//!
//! This module organizes the webhook's HTTP endpoints:
//! - `health`: service descriptor and liveness probe
//! - `status`: best-effort installation snapshot
//! - `change_domain`: the domain-change write path

pub mod change_domain;
pub mod health;
pub mod status;

use crate::{api_handler::ErrorResponse, AppState};
use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build all API routes and return a configured Router
pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/status", get(status::status_handler))
        .route("/change-domain", post(change_domain::change_domain_handler))
        // Every unregistered path/method combination gets the same body,
        // including wrong-method hits on known paths
        .fallback(not_found_handler)
        .method_not_allowed_fallback(not_found_handler)
        .with_state(state)
}

async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Endpoint not found".to_string(),
        }),
    )
}
