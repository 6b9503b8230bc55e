//! Current-domain discovery from the installation's configuration files
//!
//! The reported domain comes from the installation itself, not from webhook
//! state: first a `DOMAIN=` entry in the env file, then an `N8N_HOST` value
//! in the first compose file that carries one. Callers decide what to do
//! when nothing is found; the status endpoint falls back to `localhost`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::HookError;

/// `N8N_HOST` assignment variants across compose/YAML/JSON quoting styles
static HOST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"N8N_HOST=([^\s"']+)"#,
        r#"N8N_HOST:\s*([^\s"']+)"#,
        r#""N8N_HOST":\s*"([^"]+)""#,
        r#"N8N_HOST="([^"]+)""#,
        r#"N8N_HOST='([^']+)'"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static pattern"))
    .collect()
});

/// Configuration file locations consulted for the current domain
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// Env file holding a `DOMAIN=` entry, checked first
    pub env_file: PathBuf,
    /// Compose files checked in order for an `N8N_HOST` value
    pub compose_paths: Vec<PathBuf>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from("/root/n8n_data/.env"),
            compose_paths: vec![
                PathBuf::from("/root/n8n_data/docker-compose.yml"),
                PathBuf::from("/opt/n8n/docker-compose.yml"),
                PathBuf::from("/home/n8n/docker-compose.yml"),
                PathBuf::from("docker-compose.yml"),
            ],
        }
    }
}

/// Reads the currently configured domain out of the installation's files
pub struct EnvironmentReader {
    config: EnvironmentConfig,
}

impl EnvironmentReader {
    /// Create a reader over the given file locations
    pub fn new(config: EnvironmentConfig) -> Self {
        Self { config }
    }

    /// Report the currently configured domain.
    ///
    /// Unreadable files are skipped, not fatal; only a complete miss across
    /// every location is an error.
    pub fn current_domain(&self) -> Result<String, HookError> {
        if let Some(domain) = self.domain_from_env_file() {
            return Ok(domain);
        }
        for path in &self.config.compose_paths {
            if let Some(domain) = host_from_compose(path) {
                return Ok(domain);
            }
        }
        Err(HookError::DomainNotFound)
    }

    fn domain_from_env_file(&self) -> Option<String> {
        let content = match fs::read_to_string(&self.config.env_file) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %self.config.env_file.display(), error = %err, "env file unreadable");
                return None;
            }
        };
        for line in content.lines() {
            if let Some(value) = line.strip_prefix("DOMAIN=") {
                let domain = value.trim().trim_matches('"').trim_matches('\'');
                if !domain.is_empty() {
                    return Some(domain.to_string());
                }
            }
        }
        None
    }
}

fn host_from_compose(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    for pattern in HOST_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(&content) {
            let domain = captures[1].trim();
            // Skip unresolved variable references like ${DOMAIN}
            if !domain.starts_with("${") {
                return Some(domain.to_string());
            }
        }
    }
    None
}
