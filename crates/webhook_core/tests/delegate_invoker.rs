//! End-to-end delegate invocations against real scripts.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use tempfile::TempDir;
use webhook_core::{ChangeOutcome, DelegateConfig, DelegateError, DelegateInvoker};

/// Write an executable shell script into `dir` and return its path.
fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn invoker_for(script_path: PathBuf, timeout_secs: u64) -> DelegateInvoker {
    DelegateInvoker::new(DelegateConfig {
        script_path,
        timeout_secs,
        capture_limit: 500,
    })
}

async fn run_ok(invoker: &DelegateInvoker) -> ChangeOutcome {
    invoker.run("example.com", "admin@example.com").await.unwrap()
}

#[tokio::test]
async fn test_json_success() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "change.sh",
        r#"echo '{"success": true, "message": "switched"}'"#,
    );

    let outcome = run_ok(&invoker_for(script, 10)).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "switched");
}

#[tokio::test]
async fn test_json_reported_failure() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "change.sh",
        r#"echo 'certbot: challenge failed' >&2
echo '{"success": false, "message": "DNS challenge failed"}'"#,
    );

    let outcome = run_ok(&invoker_for(script, 10)).await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "DNS challenge failed");
    assert_eq!(outcome.stderr, "certbot: challenge failed");
}

#[tokio::test]
async fn test_nonzero_exit_code() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "change.sh", "echo 'partial output'\nexit 3");

    let outcome = run_ok(&invoker_for(script, 10)).await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "delegate exited with code 3");
    assert_eq!(outcome.stdout, "partial output");
}

#[tokio::test]
async fn test_plain_text_output_counts_as_success() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "change.sh", "echo 'reloading nginx... done'");

    let outcome = run_ok(&invoker_for(script, 10)).await;
    assert!(outcome.success);
    assert_eq!(outcome.stdout, "reloading nginx... done");
}

#[tokio::test]
async fn test_arguments_are_passed_positionally() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "change.sh", r#"echo "$1 $2""#);

    let outcome = run_ok(&invoker_for(script, 10)).await;
    assert_eq!(outcome.stdout, "example.com admin@example.com");
}

#[tokio::test]
async fn test_missing_script() {
    let invoker = invoker_for(PathBuf::from("/nonexistent/change.sh"), 10);

    let err = invoker.run("example.com", "admin@example.com").await.unwrap_err();
    assert!(matches!(err, DelegateError::ScriptMissing(_)));
}

#[tokio::test]
async fn test_timeout_is_distinguished() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "change.sh", "sleep 30");

    let err = invoker_for(script, 1)
        .run("example.com", "admin@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DelegateError::Timeout(1)));
}

#[tokio::test]
async fn test_long_output_is_truncated() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "change.sh", "head -c 2000 /dev/zero | tr '\\0' 'x'");

    let outcome = run_ok(&invoker_for(script, 10)).await;
    assert_eq!(outcome.stdout.len(), 500);
}
