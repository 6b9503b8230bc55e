//! Shared API types and error handling
//!
//! Request/response bodies for all endpoints plus the error type every
//! handler short-circuits with. Error bodies are the flat
//! `{"error": "<message>"}` shape the callers of this webhook expect.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Request body for POST /change-domain
#[derive(Debug, Deserialize)]
pub struct ChangeDomainRequest {
    /// Target domain; required, but tolerated as absent so the distinct
    /// "Invalid domain" response fires instead of a generic parse error
    #[serde(default)]
    pub domain: String,
    /// Optional notification email; defaults to `admin@<domain>`
    #[serde(default)]
    pub email: Option<String>,
}

/// Acknowledgement returned before the background work runs
#[derive(Debug, Serialize)]
pub struct ChangeDomainAck {
    pub status: String,
    pub message: String,
    pub domain: String,
    pub email: String,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Result type for API handlers
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// API error types, one per distinct short-circuit in the dispatch path
#[derive(Debug)]
pub enum ApiError {
    /// Client IP not in the allowlist; carries the offending IP
    Forbidden(String),
    MissingBody,
    InvalidJson,
    InvalidDomain,
    InvalidEmail,
    /// Installation probe reported the managed container as not running
    InstallationDown,
    /// Anything unexpected; detail is logged server-side only
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Forbidden(ip) => (
                StatusCode::FORBIDDEN,
                format!("Access denied for IP {ip}"),
            ),
            ApiError::MissingBody => (StatusCode::BAD_REQUEST, "Missing request body".to_string()),
            ApiError::InvalidJson => (StatusCode::BAD_REQUEST, "Invalid JSON".to_string()),
            ApiError::InvalidDomain => (StatusCode::BAD_REQUEST, "Invalid domain".to_string()),
            ApiError::InvalidEmail => (StatusCode::BAD_REQUEST, "Invalid email".to_string()),
            ApiError::InstallationDown => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "N8N not running".to_string(),
            ),
            ApiError::Internal(detail) => {
                error!("internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// RFC 3339 UTC timestamp with a trailing `Z`, as used in all responses.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
