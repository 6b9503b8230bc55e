//! Domain-change write path
//!
//! The only endpoint with side effects. Each gate short-circuits with its
//! own status; once every gate passes the caller gets an immediate
//! acknowledgement and the delegate runs as a detached background task
//! whose outcome is only ever logged.

use crate::{
    access,
    api_handler::{ApiError, ApiResult, ChangeDomainAck, ChangeDomainRequest},
    AppState,
};
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::HeaderMap,
    response::Json,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use webhook_core::{validation, DelegateError, EventLevel};

/// POST /change-domain
///
/// Gate order: allowlist, body presence, JSON shape, domain syntax, email
/// syntax (defaulted to `admin@<domain>` when absent), installation probe.
/// The body is taken raw so "Missing request body" and "Invalid JSON" stay
/// distinct responses.
#[instrument(skip(state, headers, body), fields(request_id))]
pub async fn change_domain_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<ChangeDomainAck> {
    let request_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("request_id", request_id.as_str());

    let client_ip = access::resolve_client_ip(&headers, peer);
    if !access::is_allowed(&client_ip, &state.config.security.allowed_ips) {
        warn!(ip = %client_ip, "rejected by allowlist");
        state
            .event_log
            .append(EventLevel::Warn, &format!("Unauthorized IP: {client_ip}"));
        return Err(ApiError::Forbidden(client_ip));
    }

    if body.is_empty() {
        return Err(ApiError::MissingBody);
    }

    let request: ChangeDomainRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::InvalidJson)?;

    let domain = request.domain.trim().to_string();
    if domain.is_empty() || !validation::validate_domain(&domain) {
        return Err(ApiError::InvalidDomain);
    }

    let email = match request.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => {
            if !validation::validate_email(email) {
                return Err(ApiError::InvalidEmail);
            }
            email.to_string()
        }
        _ => format!("admin@{domain}"),
    };

    if !state.probe.is_running().await {
        return Err(ApiError::InstallationDown);
    }

    info!(%domain, %email, "domain change accepted");

    // Fire-and-forget: the acknowledgement below never waits on this.
    spawn_delegate(Arc::clone(&state), domain.clone(), email.clone());

    Ok(Json(ChangeDomainAck {
        status: "success".to_string(),
        message: "Domain change initiated".to_string(),
        domain,
        email,
    }))
}

/// Run the delegate detached from the request handler. The task is not
/// tracked and not joined on shutdown; its only observable effect is the
/// event log.
fn spawn_delegate(state: Arc<AppState>, domain: String, email: String) {
    tokio::spawn(async move {
        state.event_log.append(
            EventLevel::Info,
            &format!("Calling domain-change delegate: {domain}"),
        );

        match state.delegate.run(&domain, &email).await {
            Ok(outcome) if outcome.success => {
                state.event_log.append(
                    EventLevel::Success,
                    &format!("Domain changed to {domain}: {}", outcome.message),
                );
                if !outcome.stdout.is_empty() {
                    state
                        .event_log
                        .append(EventLevel::Info, &format!("Delegate output: {}", outcome.stdout));
                }
                if !outcome.stderr.is_empty() {
                    state
                        .event_log
                        .append(EventLevel::Warn, &format!("Delegate stderr: {}", outcome.stderr));
                }
            }
            Ok(outcome) => {
                state.event_log.append(
                    EventLevel::Error,
                    &format!("Domain change failed: {}", outcome.message),
                );
                if !outcome.stderr.is_empty() {
                    state
                        .event_log
                        .append(EventLevel::Error, &format!("Delegate stderr: {}", outcome.stderr));
                }
                if !outcome.stdout.is_empty() {
                    state
                        .event_log
                        .append(EventLevel::Error, &format!("Delegate stdout: {}", outcome.stdout));
                }
            }
            Err(DelegateError::Timeout(secs)) => {
                state.event_log.append(
                    EventLevel::Error,
                    &format!("Domain change timeout ({secs} seconds)"),
                );
            }
            Err(err) => {
                state
                    .event_log
                    .append(EventLevel::Error, &format!("Delegate invocation failed: {err}"));
            }
        }
    });
}
