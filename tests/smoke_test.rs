//! Smoke tests for the prepmap CLI.
//!
//! These tests verify basic CLI functionality:
//! - `prepmap --version` outputs version info
//! - `prepmap --help` outputs help text
//! - commands output valid JSON by default

mod common;

use assert_cmd::Command;
use common::{TestEnv, parse_json};
use predicates::prelude::*;

/// Get a Command for the prepmap binary.
fn prepmap() -> Command {
    Command::new(env!("CARGO_BIN_EXE_prepmap"))
}

#[test]
fn test_version_flag() {
    prepmap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("prepmap"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    prepmap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("toggle"));
}

#[test]
fn test_invalid_command() {
    prepmap()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_builtin_roadmap_outputs_json() {
    let env = TestEnv::new();
    let output = env.prepmap().arg("show").output().unwrap();
    assert!(output.status.success());

    let json = parse_json(&output.stdout);
    assert_eq!(json["roadmap"], "built-in");
    // three phase labels plus three content nodes
    assert_eq!(json["nodes"].as_array().unwrap().len(), 6);
}

#[test]
fn test_missing_roadmap_file_is_an_error() {
    let env = TestEnv::new();
    env.prepmap()
        .args(["--roadmap", "nope.json", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn test_human_errors_are_plain_text() {
    let env = TestEnv::new();
    env.prepmap()
        .args(["-H", "--roadmap", "nope.json", "progress"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: "));
}

#[test]
fn test_malformed_roadmap_is_an_error() {
    let env = TestEnv::new();
    env.write_roadmap("{ not json");
    env.prepmap()
        .args(["--roadmap", "roadmap.json", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON error"));
}
