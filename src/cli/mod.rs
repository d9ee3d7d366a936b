//! CLI argument definitions for prepmap.

use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// prepmap - Track an interview-preparation roadmap from the terminal.
///
/// Start with `prepmap show -H` to see the plan, then `prepmap toggle <id>` as you work.
#[derive(Parser, Debug)]
#[command(name = "prepmap")]
#[command(author, version, about = "Visualize and track an interview-preparation roadmap", long_about = None)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("PREPMAP_GIT_COMMIT"),
    ", built ",
    env!("PREPMAP_BUILD_TIMESTAMP"),
    ")"
))]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Roadmap definition file (JSON). Can also be set via PREPMAP_ROADMAP
    /// or `roadmap` in config.kdl; the built-in plan is used otherwise.
    #[arg(short = 'r', long = "roadmap", global = true)]
    pub roadmap: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the positioned roadmap diagram
    Show {
        /// Only show nodes with this tag
        #[arg(short, long)]
        filter: Option<String>,

        /// Zoom level (clamped to the configured range)
        #[arg(short, long)]
        zoom: Option<f64>,
    },

    /// Advance a node's status: not_started -> in_progress -> done -> not_started
    Toggle {
        /// Node ID (e.g., arrays-strings)
        node_id: String,
    },

    /// Show per-phase completion
    Progress,

    /// Export the roadmap and progress (json, csv, png, pdf)
    Export {
        /// Export format
        format: ExportFormat,

        /// Directory to write the export file into
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Emit draw commands for the diagram fitted to a canvas
    Render {
        /// Only draw nodes with this tag
        #[arg(short, long)]
        filter: Option<String>,

        /// Canvas width in pixels
        #[arg(long, default_value_t = 1280.0)]
        width: f64,

        /// Canvas height in pixels
        #[arg(long, default_value_t = 800.0)]
        height: f64,
    },

    /// Check the roadmap definition for data-integrity problems
    Validate,

    /// Clear all stored progress
    Reset,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration values and where they came from
    Show,
}
