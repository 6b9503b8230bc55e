//! Configuration management for the webhook server
//!
//! This module handles loading configuration from environment variables
//! and configuration files using the figment crate. Everything here is
//! loaded once at startup and immutable for the process lifetime.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub delegate: DelegateSettings,
    pub status: StatusSettings,
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// PID marker file written at startup, removed at clean shutdown
    pub pid_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8888,
            pid_file: "/tmp/n8n-webhook.pid".to_string(),
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// IPv4 literals allowed to invoke the write endpoint.
    /// Exact string match only; no CIDR ranges.
    pub allowed_ips: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_ips: vec![
                "123.25.21.12".to_string(),
                "210.211.99.45".to_string(),
                "125.212.192.47".to_string(),
                "103.57.223.33".to_string(),
            ],
        }
    }
}

/// Delegate script configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegateSettings {
    /// Path to the domain-change script
    pub script_path: String,
    /// Wall-clock timeout for one invocation, in seconds
    pub timeout_secs: u64,
    /// Captured output retained per stream, in bytes
    pub capture_limit: usize,
}

impl Default for DelegateSettings {
    fn default() -> Self {
        Self {
            script_path: "/opt/n8npanel/v3/common/domain_change_wrapper.sh".to_string(),
            timeout_secs: 600,
            capture_limit: 500,
        }
    }
}

/// Status endpoint collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSettings {
    /// Env file holding a `DOMAIN=` entry, checked first
    pub env_file: String,
    /// Compose files checked in order for an `N8N_HOST` value
    pub compose_paths: Vec<String>,
    /// Container runtime binary used for the installation probe
    pub container_runtime: String,
    /// Name marker identifying the installation in the process list
    pub container_marker: String,
    /// Echo-IP service consulted for the server's public address
    pub ip_service_url: String,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            env_file: "/root/n8n_data/.env".to_string(),
            compose_paths: vec![
                "/root/n8n_data/docker-compose.yml".to_string(),
                "/opt/n8n/docker-compose.yml".to_string(),
                "/home/n8n/docker-compose.yml".to_string(),
                "docker-compose.yml".to_string(),
            ],
            container_runtime: "docker".to_string(),
            container_marker: "n8n".to_string(),
            ip_service_url: "https://ifconfig.me".to_string(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Enable JSON structured logging
    pub json_logs: bool,
    /// Log level filter
    pub log_level: String,
    /// Operator-facing webhook event log file
    pub event_log_file: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            log_level: "info".to_string(),
            event_log_file: "/var/log/n8npanel/n8n-webhook.log".to_string(),
        }
    }
}

/// Environment variable names for configuration
#[allow(dead_code)]
pub mod env_vars {
    pub const SERVER_HOST: &str = "WEBHOOK_SERVER_HOST";
    pub const SERVER_PORT: &str = "WEBHOOK_SERVER_PORT";
    pub const PID_FILE: &str = "WEBHOOK_SERVER_PID_FILE";
    pub const DELEGATE_SCRIPT: &str = "WEBHOOK_DELEGATE_SCRIPT_PATH";
    pub const DELEGATE_TIMEOUT: &str = "WEBHOOK_DELEGATE_TIMEOUT_SECS";
    pub const JSON_LOGS: &str = "WEBHOOK_OBSERVABILITY_JSON_LOGS";
    pub const LOG_LEVEL: &str = "WEBHOOK_OBSERVABILITY_LOG_LEVEL";
}
