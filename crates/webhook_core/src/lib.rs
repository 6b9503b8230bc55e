//! # webhook_core
//!
//! Core logic for the n8n domain-change webhook service: input validation,
//! invocation of the external domain-change script, discovery of the
//! currently configured domain, installation/network probes, and the
//! operator-facing event log.
//!
//! The HTTP surface lives in the `webhook_api` crate; everything here is
//! usable without axum.
//!
//! ## Example
//!
//! ```rust,no_run
//! use webhook_core::{DelegateConfig, DelegateInvoker};
//!
//! #[tokio::main]
//! async fn main() {
//!     let invoker = DelegateInvoker::new(DelegateConfig::default());
//!     match invoker.run("example.com", "admin@example.com").await {
//!         Ok(outcome) => println!("success: {}", outcome.success),
//!         Err(err) => eprintln!("invocation failed: {}", err),
//!     }
//! }
//! ```

pub mod delegate;
pub mod environment;
pub mod event_log;
pub mod probe;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Final outcome of one delegate invocation.
///
/// Produced by the [`DelegateInvoker`](delegate::DelegateInvoker) once the
/// external script has run to completion, consumed only by the background
/// logger. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeOutcome {
    /// Whether the domain change succeeded overall
    pub success: bool,
    /// Human-readable summary of the outcome
    pub message: String,
    /// Captured standard output, truncated for logging
    pub stdout: String,
    /// Captured standard error, truncated for logging
    pub stderr: String,
}

/// Errors from the status collaborators (environment reader and probes)
#[derive(Error, Debug)]
pub enum HookError {
    #[error("no domain found in any configuration file")]
    DomainNotFound,
    #[error("lookup failed: {0}")]
    LookupFailed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised by the delegate invoker before an outcome can be produced.
///
/// A completed run, even a failing one, is a [`ChangeOutcome`]; these
/// variants cover the cases where the script never ran to completion, each
/// logged with its own cause so a hang can be told apart from a reported
/// failure.
#[derive(Error, Debug)]
pub enum DelegateError {
    #[error("delegate script not found: {}", .0.display())]
    ScriptMissing(PathBuf),
    #[error("delegate timed out after {0} seconds")]
    Timeout(u64),
    #[error("failed to run delegate: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HookError>;

// Re-export main types
pub use delegate::{DelegateConfig, DelegateInvoker};
pub use environment::{EnvironmentConfig, EnvironmentReader};
pub use event_log::{EventLevel, EventLog};
pub use probe::{InstallationProbe, ProbeConfig, ServerIpLookup};
pub use validation::{validate_domain, validate_email};
