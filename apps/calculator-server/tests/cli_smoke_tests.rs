#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the calculator-server binary.

use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn server_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_calculator-server"));
    cmd.env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

/// Helper to run the calculator-server binary with given arguments
fn run_calculator_server(args: &[&str]) -> std::process::Output {
    server_command()
        .args(args)
        .output()
        .expect("Failed to execute calculator-server")
}

#[test]
fn test_cli_help_command() {
    let output = run_calculator_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--bind"), "Should mention bind option");
}

#[test]
fn test_cli_version_command() {
    let output = run_calculator_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("calculator-server"), "Should contain binary name");
    assert!(
        stdout.chars().any(|c| c.is_ascii_digit()),
        "Should contain version numbers"
    );
}

#[test]
fn test_cli_invalid_command() {
    let output = run_calculator_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report an error: {stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_calculator_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(
        !output.status.success(),
        "Should fail when config file doesn't exist"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Should indicate config file not found: {stderr}"
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_calculator_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to load configuration"),
        "Should mention configuration loading: {stderr}"
    );
}

#[test]
fn test_cli_config_validation_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("valid.yaml");

    let config_content = r#"
server:
  bind_addr: "127.0.0.1:6001"
  queue_capacity: 8

logging:
  level: "warn"
  format: "json"
"#;
    std::fs::write(&config_path, config_content).expect("Failed to write config");

    let output = run_calculator_server(&["--config", config_path.to_str().unwrap(), "check"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Valid config should pass: {stderr}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains("127.0.0.1:6001"));
    assert!(stdout.contains("\"queue_capacity\": 8"));
}

#[test]
fn test_cli_print_config_applies_bind_override() {
    let output = run_calculator_server(&["--bind", "0.0.0.0:6002", "--print-config"]);

    assert!(output.status.success(), "print-config should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Effective configuration"));
    assert!(stdout.contains("0.0.0.0:6002"));
    assert!(stdout.contains("http://127.0.0.1:50051"));
}

#[test]
fn test_cli_env_override_is_validated() {
    let output = server_command()
        .env("CALC__SERVER__QUEUE_CAPACITY", "0")
        .arg("check")
        .output()
        .expect("Failed to execute calculator-server");

    assert!(!output.status.success(), "Zero queue capacity should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("server.queue_capacity"),
        "Should name the offending field: {stderr}"
    );
}

#[test]
fn test_cli_rejects_invalid_bind_address() {
    let output = run_calculator_server(&["--bind", "not-an-address", "check"]);

    assert!(!output.status.success(), "Invalid bind address should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("server.bind_addr"), "stderr: {stderr}");
}

#[tokio::test]
async fn test_cli_run_keeps_serving_until_killed() {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_calculator-server"));
    cmd.args(["--bind", "127.0.0.1:0", "run"])
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().expect("Failed to spawn calculator-server");

    // A healthy server is still running after the grace period.
    let waited = timeout(Duration::from_millis(1500), child.wait()).await;
    assert!(waited.is_err(), "server exited early: {waited:?}");

    child.kill().await.expect("Failed to kill calculator-server");
}
