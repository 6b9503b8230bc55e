//! HTTP surface of the N8N domain-change webhook
//!
//! Router assembly, configuration, access control, and route handlers.
//! The binary in `main.rs` wires this together with config loading,
//! tracing, and process lifecycle.

use axum::http::{header, HeaderValue};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use webhook_core::{
    DelegateConfig, DelegateInvoker, EnvironmentConfig, EnvironmentReader, EventLog,
    InstallationProbe, ProbeConfig, ServerIpLookup,
};

pub mod access;
pub mod api_handler;
pub mod config;
pub mod routes;

pub use config::AppConfig;

/// Shared application state
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub delegate: DelegateInvoker,
    pub environment: EnvironmentReader,
    pub probe: InstallationProbe,
    pub ip_lookup: ServerIpLookup,
    pub event_log: EventLog,
}

/// Construct the collaborators from the loaded configuration
pub fn build_state(config: AppConfig) -> AppState {
    let delegate = DelegateInvoker::new(DelegateConfig {
        script_path: PathBuf::from(&config.delegate.script_path),
        timeout_secs: config.delegate.timeout_secs,
        capture_limit: config.delegate.capture_limit,
    });

    let environment = EnvironmentReader::new(EnvironmentConfig {
        env_file: PathBuf::from(&config.status.env_file),
        compose_paths: config.status.compose_paths.iter().map(PathBuf::from).collect(),
    });

    let probe_config = ProbeConfig {
        runtime: config.status.container_runtime.clone(),
        container_marker: config.status.container_marker.clone(),
        ip_service_url: config.status.ip_service_url.clone(),
    };

    let event_log = EventLog::new(&config.observability.event_log_file);

    AppState {
        delegate,
        environment,
        probe: InstallationProbe::new(probe_config.clone()),
        ip_lookup: ServerIpLookup::new(probe_config),
        event_log,
        config: Arc::new(config),
    }
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    routes::build_routes(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers(tower_http::cors::Any),
        )
        // Responses are one-shot; close every connection after answering
        .layer(SetResponseHeaderLayer::overriding(
            header::CONNECTION,
            HeaderValue::from_static("close"),
        ))
}
