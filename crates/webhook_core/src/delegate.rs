//! External domain-change delegate invocation
//!
//! The actual reconfiguration work is owned by an external script, invoked
//! as `<script> <domain> <email>`. This module spawns it with captured
//! stdio, enforces a wall-clock timeout, and interprets its response:
//! a JSON object with a boolean `success` on stdout when the script is
//! well-behaved, the exit code as the authoritative fallback otherwise.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::{ChangeOutcome, DelegateError};

/// Configuration for the delegate invoker
#[derive(Debug, Clone)]
pub struct DelegateConfig {
    /// Path to the domain-change script
    pub script_path: PathBuf,
    /// Wall-clock timeout for one invocation, in seconds
    pub timeout_secs: u64,
    /// Captured output retained per stream, in bytes
    pub capture_limit: usize,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from("/opt/n8npanel/v3/common/domain_change_wrapper.sh"),
            timeout_secs: 600,
            capture_limit: 500,
        }
    }
}

/// Structured response the script may emit on stdout
#[derive(Debug, Deserialize)]
struct DelegateResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Runs the external domain-change script and interprets its outcome
pub struct DelegateInvoker {
    config: DelegateConfig,
}

impl DelegateInvoker {
    /// Create an invoker with the given configuration
    pub fn new(config: DelegateConfig) -> Self {
        Self { config }
    }

    /// Run the delegate for `domain`/`email` and interpret its response.
    ///
    /// # Returns
    /// * `Ok(ChangeOutcome)` once the script ran to completion, whether it
    ///   reported success or failure
    /// * `Err(DelegateError)` when the script is missing, could not be
    ///   spawned, or exceeded the timeout
    pub async fn run(&self, domain: &str, email: &str) -> Result<ChangeOutcome, DelegateError> {
        let script = &self.config.script_path;
        if !script.exists() {
            return Err(DelegateError::ScriptMissing(script.clone()));
        }

        info!(script = %script.display(), domain, "invoking domain-change delegate");

        let child = Command::new(script)
            .arg(domain)
            .arg(email)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // a timed-out child must not linger once its future is dropped
            .kill_on_drop(true)
            .spawn()?;

        let wait = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(wait, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => return Err(DelegateError::Timeout(self.config.timeout_secs)),
        };

        debug!(code = ?output.status.code(), "delegate exited");

        Ok(self.interpret(domain, &output))
    }

    /// Turn raw exit status and captured streams into a [`ChangeOutcome`].
    fn interpret(&self, domain: &str, output: &std::process::Output) -> ChangeOutcome {
        let stdout = truncate_stream(&output.stdout, self.config.capture_limit);
        let stderr = truncate_stream(&output.stderr, self.config.capture_limit);

        if !output.status.success() {
            return ChangeOutcome {
                success: false,
                message: format!(
                    "delegate exited with code {}",
                    output
                        .status
                        .code()
                        .map_or_else(|| "unknown".to_string(), |c| c.to_string())
                ),
                stdout,
                stderr,
            };
        }

        match serde_json::from_slice::<DelegateResponse>(&output.stdout) {
            Ok(response) if response.success => ChangeOutcome {
                success: true,
                message: response
                    .message
                    .unwrap_or_else(|| format!("Domain changed to {domain}")),
                stdout,
                stderr,
            },
            Ok(response) => ChangeOutcome {
                success: false,
                message: response.message.unwrap_or_else(|| "Unknown error".to_string()),
                stdout,
                stderr,
            },
            // Not a JSON object: the zero exit code is authoritative
            Err(_) => ChangeOutcome {
                success: true,
                message: format!("Domain changed to {domain} (no JSON response)"),
                stdout,
                stderr,
            },
        }
    }
}

/// Lossily decode a captured stream and bound it to `limit` bytes.
fn truncate_stream(bytes: &[u8], limit: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim_end();
    if trimmed.len() <= limit {
        return trimmed.to_string();
    }
    let mut end = limit;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
