//! Common test utilities for prepmap integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/prepmap/` or `~/.config/prepmap/` directories.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// Roadmap with two phases: P1 = [A, B(dependsOn A)], P2 = [C(dependsOn B)].
pub const CHAIN_ROADMAP: &str = r#"[
  {
    "id": "p1",
    "title": "Phase One",
    "weekRange": [1, 2],
    "nodes": [
      { "id": "A", "title": "Node A", "tags": ["DSA", "Core"], "estimatedHours": 5 },
      { "id": "B", "title": "Node B", "tags": ["DSA"], "dependsOn": ["A"] }
    ]
  },
  {
    "id": "p2",
    "title": "Phase Two",
    "nodes": [
      { "id": "C", "title": "Node C", "dependsOn": ["B"], "status": "confident" }
    ]
  }
]"#;

/// A test environment with isolated directories.
///
/// - `work_dir`: current directory for the process (default export target)
/// - `data_dir`: progress storage (via `PREPMAP_DATA_DIR`)
/// - `config_dir`: config.kdl location (via `PREPMAP_CONFIG_DIR`)
///
/// The `prepmap()` method sets the variables per-invocation, making tests
/// parallel-safe.
pub struct TestEnv {
    pub work_dir: TempDir,
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a test environment with the chain roadmap written to `roadmap.json`.
    pub fn with_chain_roadmap() -> Self {
        let env = Self::new();
        env.write_roadmap(CHAIN_ROADMAP);
        env
    }

    /// Get a Command for the prepmap binary with isolated directories.
    pub fn prepmap(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_prepmap"));
        cmd.current_dir(self.work_dir.path());
        cmd.env("PREPMAP_DATA_DIR", self.data_dir.path());
        cmd.env("PREPMAP_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("PREPMAP_ROADMAP");
        cmd.env_remove("PREPMAP_LOG");
        cmd
    }

    /// Write `roadmap.json` into the work directory and return its path.
    pub fn write_roadmap(&self, json: &str) -> PathBuf {
        let path = self.work_dir.path().join("roadmap.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    pub fn roadmap_path(&self) -> PathBuf {
        self.work_dir.path().join("roadmap.json")
    }

    /// Write config.kdl into the config directory.
    pub fn write_config(&self, kdl: &str) {
        std::fs::write(self.config_dir.path().join("config.kdl"), kdl).unwrap();
    }

    /// Raw contents of the stored progress blob, if any.
    pub fn stored_progress(&self) -> Option<String> {
        std::fs::read_to_string(self.data_dir.path().join("roadmapProgress.json")).ok()
    }

    pub fn work_path(&self) -> &Path {
        self.work_dir.path()
    }

    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a command's stdout as JSON.
pub fn parse_json(stdout: &[u8]) -> serde_json::Value {
    serde_json::from_slice(stdout).expect("stdout should be valid JSON")
}
