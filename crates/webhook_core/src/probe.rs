//! Installation and network probes backing the status endpoint
//!
//! Both probes are best-effort collaborators: the installation probe answers
//! a plain yes/no, and the self-IP lookup returns an error the caller maps
//! to a fallback address. Neither is ever fatal to a request.

use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::HookError;

const RUNTIME_LIST_TIMEOUT: Duration = Duration::from_secs(10);
const IP_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration shared by the probes
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Container runtime binary used for the process listing
    pub runtime: String,
    /// Name marker identifying the installation in the process list
    pub container_marker: String,
    /// Echo-IP service consulted for the public address
    pub ip_service_url: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            runtime: "docker".to_string(),
            container_marker: "n8n".to_string(),
            ip_service_url: "https://ifconfig.me".to_string(),
        }
    }
}

/// Checks whether the managed container is currently running
pub struct InstallationProbe {
    config: ProbeConfig,
}

impl InstallationProbe {
    /// Create a probe with the given configuration
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Whether the name marker shows up in the runtime's process listing.
    ///
    /// Any failure (missing runtime, nonzero exit, timeout) reads as "not
    /// running".
    pub async fn is_running(&self) -> bool {
        let listing = Command::new(&self.config.runtime).arg("ps").output();
        match timeout(RUNTIME_LIST_TIMEOUT, listing).await {
            Ok(Ok(output)) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).contains(&self.config.container_marker)
            }
            Ok(Ok(output)) => {
                debug!(code = ?output.status.code(), "container runtime listing failed");
                false
            }
            Ok(Err(err)) => {
                debug!(error = %err, "could not run container runtime");
                false
            }
            Err(_) => {
                warn!("container runtime listing timed out");
                false
            }
        }
    }
}

/// Resolves the server's own IP address
pub struct ServerIpLookup {
    config: ProbeConfig,
    client: reqwest::Client,
}

impl ServerIpLookup {
    /// Create a lookup with the given configuration
    pub fn new(config: ProbeConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Resolve the server IP: echo-IP service first, `hostname -I` second.
    pub async fn lookup(&self) -> Result<String, HookError> {
        match self.from_echo_service().await {
            Ok(ip) => Ok(ip),
            Err(err) => {
                debug!(error = %err, "echo-IP service unavailable, trying hostname");
                self.from_hostname().await
            }
        }
    }

    async fn from_echo_service(&self) -> Result<String, HookError> {
        let body = self
            .client
            .get(&self.config.ip_service_url)
            .timeout(IP_LOOKUP_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let ip = body.trim();
        if ip.is_empty() {
            return Err(HookError::LookupFailed("empty echo-IP response".to_string()));
        }
        Ok(ip.to_string())
    }

    async fn from_hostname(&self) -> Result<String, HookError> {
        let listing = Command::new("hostname").arg("-I").output();
        let output = timeout(IP_LOOKUP_TIMEOUT, listing)
            .await
            .map_err(|_| HookError::LookupFailed("hostname lookup timed out".to_string()))??;
        if !output.status.success() {
            return Err(HookError::LookupFailed(format!(
                "hostname exited with code {:?}",
                output.status.code()
            )));
        }
        String::from_utf8_lossy(&output.stdout)
            .split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or_else(|| HookError::LookupFailed("hostname reported no addresses".to_string()))
    }
}
