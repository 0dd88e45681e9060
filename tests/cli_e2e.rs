//! End-to-end CLI tests for the xhs binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("xhs").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Extract metadata"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("xhs").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xhs"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("xhs").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test that a missing subcommand prints usage and fails.
#[test]
fn test_binary_requires_subcommand() {
    let mut cmd = Command::cargo_bin("xhs").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

/// Test that check reports false for an unknown work ID.
#[test]
fn test_check_unknown_work_id_prints_false() {
    let temp = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("xhs").unwrap();
    cmd.arg("-q")
        .arg("-w")
        .arg(temp.path())
        .arg("check")
        .arg("abc123")
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));
}

/// Test that extract over link-free text prints an empty JSON array.
#[test]
fn test_extract_without_links_outputs_empty_array() {
    let temp = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("xhs").unwrap();
    cmd.arg("-q")
        .arg("-w")
        .arg(temp.path())
        .arg("extract")
        .arg("nothing interesting here")
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}
