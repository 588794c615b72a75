//! Runs the built binary. None of these cases reach the network.

mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::json;
use tempfile::TempDir;

use common::{valid_entry, write_document};

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_changelog-validate"))
        .args(args)
        .current_dir(cwd)
        .env("XDG_CONFIG_HOME", cwd)
        .env("HOME", cwd)
        .env_remove("RUST_LOG")
        .env_remove("CHANGELOG_VALIDATE_TIMEOUT")
        .env_remove("CHANGELOG_VALIDATE_VERBOSE")
        .env_remove("CHANGELOG_VALIDATE_QUIET")
        .output()
        .expect("Failed to run changelog-validate")
}

#[test]
fn test_cli_help_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&["--help"], temp_dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--target"));
    assert!(stdout.contains("--timeout"));
}

#[test]
fn test_cli_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&["does-not-exist.json"], temp_dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Fatal error: Unable to read file 'does-not-exist.json'"));
}

#[test]
fn test_cli_verbose_logs_startup() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&["--verbose", "does-not-exist.json"], temp_dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let loaded = stderr
        .find("configuration loaded")
        .expect("startup is logged under --verbose");
    let fatal = stderr.find("Fatal error:").unwrap();
    assert!(loaded < fatal);
}

#[test]
fn test_cli_invalid_json() {
    let (temp_dir, path) = write_document("[{");
    let output = run(&[path.to_str().unwrap()], temp_dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Checking Change Log JSON syntax..."));
    assert!(!stdout.contains("[PASS]"));
    assert!(stderr.contains("Fatal error: EOF while parsing"));
}

#[test]
fn test_cli_structural_error_transcript() {
    let mut entry = valid_entry(1);
    entry.as_object_mut().unwrap().remove("blog_url");
    let (temp_dir, path) = write_document(&json!([entry]).to_string());

    let output = run(&[path.to_str().unwrap()], temp_dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains(&format!("File: {}", path.display())));
    assert_eq!(stdout.matches("[PASS]").count(), 1);
    assert!(stdout.contains("Validating Change Log JSON grammar..."));
    assert!(!stdout.contains("Validating Change Log URLs..."));
    assert!(stderr.contains("Entry 1: 'Release 1'\nAn expected property is missing: blog_url"));
}

#[test]
fn test_cli_quiet_only_prints_fatal() {
    let (temp_dir, path) = write_document("{}");
    let output = run(&["--quiet", path.to_str().unwrap()], temp_dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("JSON body must be a defined Array."));
}

#[test]
fn test_cli_no_inputs() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&[], temp_dir.path());

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No changelog files given"));
}

#[test]
fn test_cli_conflicting_options() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&["--verbose", "--quiet", "entries.json"], temp_dir.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"));
}

#[test]
fn test_cli_runs_configured_target() {
    let temp_dir = TempDir::new().unwrap();
    let dev_dir = temp_dir.path().join("public/dev/changelog");
    fs::create_dir_all(&dev_dir).unwrap();
    fs::write(dev_dir.join("entries.json"), r#"{"not": "an array"}"#).unwrap();
    fs::write(
        temp_dir.path().join("changelog-validate.toml"),
        r#"
[targets.dev]
src = ["public/dev/changelog/entries.json"]

[targets.prod]
src = ["public/prod/changelog/entries.json"]
"#,
    )
    .unwrap();

    let output = run(&["--target", "dev"], temp_dir.path());
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("File: public/dev/changelog/entries.json (dev)"));
    assert!(stderr.contains("JSON body must be a defined Array."));

    let output = run(&["--target", "staging"], temp_dir.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown target: staging"));
}
