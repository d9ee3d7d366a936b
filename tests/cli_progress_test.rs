//! Integration tests for `prepmap progress`.

mod common;

use common::{TestEnv, parse_json};
use predicates::prelude::*;

fn store(env: &TestEnv, blob: &str) {
    std::fs::write(env.data_path().join("roadmapProgress.json"), blob).unwrap();
}

#[test]
fn test_progress_per_phase() {
    let env = TestEnv::with_chain_roadmap();
    store(&env, r#"{"A":"done"}"#);

    let output = env
        .prepmap()
        .args(["--roadmap", "roadmap.json", "progress"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = parse_json(&output.stdout);
    assert_eq!(json["phases"][0]["percentage"], 50);
    assert_eq!(json["phases"][1]["percentage"], 0);
    assert_eq!(json["done"], 1);
    assert_eq!(json["total"], 3);
    assert_eq!(json["percentage"], 33);
}

#[test]
fn test_progress_ignores_unknown_stored_values() {
    let env = TestEnv::with_chain_roadmap();
    store(&env, r#"{"A":"finished","B":"done"}"#);

    let output = env
        .prepmap()
        .args(["--roadmap", "roadmap.json", "progress"])
        .output()
        .unwrap();
    let json = parse_json(&output.stdout);
    assert_eq!(json["phases"][0]["done"], 1);
}

#[test]
fn test_progress_empty_phase_is_zero() {
    let env = TestEnv::new();
    env.write_roadmap(r#"{"phases":[{"id":"empty","title":"Empty","nodes":[]}]}"#);

    let output = env
        .prepmap()
        .args(["--roadmap", "roadmap.json", "progress"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = parse_json(&output.stdout);
    assert_eq!(json["phases"][0]["percentage"], 0);
    assert_eq!(json["percentage"], 0);
}

#[test]
fn test_progress_human() {
    let env = TestEnv::with_chain_roadmap();
    store(&env, r#"{"B":"in_progress"}"#);

    env.prepmap()
        .args(["-H", "--roadmap", "roadmap.json", "progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase One (weeks 1-2): 0/2 done (0%), 1 in progress, ~5h remaining"))
        .stdout(predicate::str::contains("Overall: 0/3 done (0%)"));
}
