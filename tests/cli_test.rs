//! Integration tests for the linty CLI binary.

use std::process::Command;

fn linty_bin() -> &'static str {
    env!("CARGO_BIN_EXE_linty")
}

/// Verify the binary can be invoked and shows help.
#[test]
fn test_cli_help() {
    let output = Command::new(linty_bin())
        .args(["--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("linty") || stdout.contains("Usage"));
    assert!(stdout.contains("--provider"));
}

/// Verify the binary shows version information.
#[test]
fn test_cli_version() {
    let output = Command::new(linty_bin())
        .args(["--version"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("linty"));
}

/// Dry-run shows the configuration and makes no LLM calls (so it needs
/// no API key and no rules file).
#[test]
fn test_dry_run_mode() {
    let temp_dir = tempfile::TempDir::new().expect("temp dir");

    let output = Command::new(linty_bin())
        .current_dir(temp_dir.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY")
        .args(["--dry-run"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Dry Run"));
    assert!(stdout.contains("No LLM calls"));
}

/// A missing rules file is a fatal setup failure with a suggestion.
#[test]
fn test_missing_rules_file_is_fatal() {
    let temp_dir = tempfile::TempDir::new().expect("temp dir");

    let output = Command::new(linty_bin())
        .current_dir(temp_dir.path())
        .env("OPENAI_API_KEY", "sk-test-not-used")
        .args(["missing-rules.txt"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found") || stderr.contains("Failed to read rules file"));
}
