//! N8N Domain Change Webhook Server
//!
//! Single-endpoint webhook built with axum and tokio: accepts a
//! domain-change request, validates caller identity and input, and hands
//! the actual reconfiguration to an external script while the caller gets
//! an immediate acknowledgement.

use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webhook_api::{build_state, create_router, AppConfig};

/// N8N domain-change webhook server
#[derive(Debug, Parser)]
#[command(name = "n8n-webhook", version)]
struct Cli {
    /// Listening port (overrides configuration)
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = load_config()?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Initialize tracing/logging
    init_tracing(&config)?;

    info!("Starting N8N Domain Change Webhook v{}", env!("CARGO_PKG_VERSION"));
    info!("Allowlist has {} entries", config.security.allowed_ips.len());

    // Create shared application state and the router
    let state = build_state(config.clone());
    let app = create_router(Arc::new(state));

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    write_pid_file(&config.server.pid_file)?;

    info!("Server listening on {}", addr);
    info!("Webhook endpoint: http://{}/change-domain", addr);
    info!("Status endpoint: http://{}/status", addr);

    // Serve with graceful shutdown. Background delegate invocations are not
    // awaited; an in-flight domain change outlives the server.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    remove_pid_file(&config.server.pid_file);
    info!("Server shut down gracefully");
    Ok(())
}

/// Load application configuration from environment and files
fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    // Start with a base configuration using defaults
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    // Try to load config file if it exists (optional)
    if std::path::Path::new("Webhook.toml").exists() {
        figment = figment.merge(Toml::file("Webhook.toml"));
    }

    // Override with environment variables
    figment = figment.merge(Env::prefixed("WEBHOOK_").split("_"));

    let config: AppConfig = figment.extract()?;

    Ok(config)
}

/// Initialize tracing and logging
fn init_tracing(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.observability.log_level.clone().into());

    if config.observability.json_logs {
        // JSON format for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Human-readable format for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}

/// Write the PID marker file consumed by the panel's supervision scripts
fn write_pid_file(path: &str) -> std::io::Result<()> {
    std::fs::write(path, std::process::id().to_string())
}

fn remove_pid_file(path: &str) {
    if let Err(err) = std::fs::remove_file(path) {
        warn!(path, error = %err, "could not remove PID file");
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
