//! Operator-facing webhook event log
//!
//! One line per event, `[timestamp] [LEVEL] message`, appended to a plain
//! text file operators tail to follow domain changes. Writes are
//! best-effort: the log never fails a request. Every entry is mirrored to
//! `tracing` so structured logs stay complete even when the file is not
//! writable.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{error, info, warn};

/// Severity labels used in the event log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warn,
    Error,
    Success,
}

impl EventLevel {
    fn as_str(self) -> &'static str {
        match self {
            EventLevel::Info => "INFO",
            EventLevel::Warn => "WARN",
            EventLevel::Error => "ERROR",
            EventLevel::Success => "SUCCESS",
        }
    }
}

/// Append-only line log for webhook events
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    /// Open an event log at `path`, creating the parent directory if needed.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        Self { path }
    }

    /// Append one event line. File errors are swallowed.
    pub fn append(&self, level: EventLevel, message: &str) {
        match level {
            EventLevel::Info | EventLevel::Success => info!("{message}"),
            EventLevel::Warn => warn!("{message}"),
            EventLevel::Error => error!("{message}"),
        }

        let line = format!(
            "[{}] [{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.as_str(),
            message
        );
        let _ = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use tempfile::TempDir;

    #[test]
    fn test_append_writes_formatted_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("webhook.log");
        let log = EventLog::new(&path);

        log.append(EventLevel::Info, "Calling delegate: example.com");
        log.append(EventLevel::Success, "Domain changed to example.com");

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let format = Regex::new(
            r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\] \[(INFO|WARN|ERROR|SUCCESS)\] .+$",
        )
        .unwrap();
        assert!(format.is_match(lines[0]));
        assert!(lines[0].contains("[INFO]"));
        assert!(lines[1].contains("[SUCCESS] Domain changed to example.com"));
    }

    #[test]
    fn test_creates_missing_log_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("dir").join("webhook.log");
        let log = EventLog::new(&path);

        log.append(EventLevel::Warn, "Unauthorized IP: 1.2.3.4");

        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        let log = EventLog::new("/proc/definitely/not/writable.log");
        log.append(EventLevel::Error, "dropped on the floor");
    }
}
