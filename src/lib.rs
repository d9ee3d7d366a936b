//! prepmap - Interview-preparation roadmap tracking.
//!
//! This library provides the core functionality for the `prepmap` CLI tool:
//! the roadmap data model, persisted per-node progress, the deterministic
//! diagram layout, the status transition engine, progress aggregation, and
//! export.

pub mod cli;
pub mod commands;
pub mod config;
pub mod diagram;
pub mod export;
pub mod models;
pub mod progress;
pub mod storage;


/// Library-level error type for prepmap operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Export format is declared but has no implementation yet.
    #[error("{0} export is not available yet")]
    ExportUnavailable(&'static str),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for prepmap operations.
pub type Result<T> = std::result::Result<T, Error>;
