//! Integration tests for `prepmap toggle` and `prepmap reset`.

mod common;

use common::{TestEnv, parse_json};
use predicates::prelude::*;

fn toggle(env: &TestEnv, id: &str) -> serde_json::Value {
    let output = env
        .prepmap()
        .args(["--roadmap", "roadmap.json", "toggle", id])
        .output()
        .unwrap();
    assert!(output.status.success(), "toggle {} failed", id);
    parse_json(&output.stdout)
}

#[test]
fn test_toggle_cycles_and_persists() {
    let env = TestEnv::with_chain_roadmap();
    assert!(env.stored_progress().is_none());

    let first = toggle(&env, "A");
    assert_eq!(first["previous"], "not_started");
    assert_eq!(first["status"], "in_progress");
    assert_eq!(first["persisted"], true);
    assert_eq!(env.stored_progress().unwrap(), r#"{"A":"in_progress"}"#);

    assert_eq!(toggle(&env, "A")["status"], "done");
    assert_eq!(toggle(&env, "A")["status"], "not_started");
}

#[test]
fn test_toggle_reports_phase_percentage() {
    let env = TestEnv::with_chain_roadmap();
    toggle(&env, "A");
    let done = toggle(&env, "A");
    assert_eq!(done["phase"]["phase_id"], "p1");
    assert_eq!(done["phase"]["percentage"], 50);
}

#[test]
fn test_toggle_confident_moves_to_in_progress() {
    let env = TestEnv::with_chain_roadmap();
    let result = toggle(&env, "C");
    assert_eq!(result["previous"], "confident");
    assert_eq!(result["status"], "in_progress");
}

#[test]
fn test_toggle_unknown_node_fails() {
    let env = TestEnv::with_chain_roadmap();
    env.prepmap()
        .args(["--roadmap", "roadmap.json", "toggle", "Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Node not found: Z"));
    assert!(env.stored_progress().is_none());
}

#[test]
fn test_toggle_phase_label_fails() {
    let env = TestEnv::with_chain_roadmap();
    env.prepmap()
        .args(["--roadmap", "roadmap.json", "toggle", "phase-p1"])
        .assert()
        .failure();
}

#[test]
fn test_toggle_keeps_entries_for_other_roadmaps() {
    let env = TestEnv::with_chain_roadmap();
    std::fs::write(
        env.data_path().join("roadmapProgress.json"),
        r#"{"elsewhere":"done"}"#,
    )
    .unwrap();

    toggle(&env, "B");
    let stored: serde_json::Value =
        serde_json::from_str(&env.stored_progress().unwrap()).unwrap();
    assert_eq!(stored["elsewhere"], "done");
    assert_eq!(stored["B"], "in_progress");
}

#[test]
fn test_toggle_recovers_from_corrupt_store() {
    let env = TestEnv::with_chain_roadmap();
    std::fs::write(env.data_path().join("roadmapProgress.json"), "not json").unwrap();

    let result = toggle(&env, "A");
    assert_eq!(result["previous"], "not_started");
    assert_eq!(env.stored_progress().unwrap(), r#"{"A":"in_progress"}"#);
}

#[test]
fn test_toggle_human_output() {
    let env = TestEnv::with_chain_roadmap();
    env.prepmap()
        .args(["-H", "--roadmap", "roadmap.json", "toggle", "A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Node A (A): Not Started -> In Progress"))
        .stdout(predicate::str::contains("Phase One: 0% complete"));
}

#[test]
fn test_reset_clears_progress() {
    let env = TestEnv::with_chain_roadmap();
    toggle(&env, "A");
    toggle(&env, "B");

    let output = env.prepmap().arg("reset").output().unwrap();
    assert!(output.status.success());
    assert_eq!(parse_json(&output.stdout)["cleared"], 2);
    assert!(env.stored_progress().is_none());

    // after a reset every node falls back to its authored status
    let output = env
        .prepmap()
        .args(["--roadmap", "roadmap.json", "progress"])
        .output()
        .unwrap();
    assert_eq!(parse_json(&output.stdout)["done"], 0);
}
