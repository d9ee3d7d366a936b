//! Configuration for prepmap.
//!
//! ## config.kdl - User preferences
//!
//! Located at:
//! - `$PREPMAP_CONFIG_DIR/config.kdl` when the variable is set
//! - `~/.config/prepmap/config.kdl` otherwise
//!
//! Contains:
//! - `output-format` - "json" or "human"
//! - `roadmap` - Roadmap definition file (JSON)
//! - `export-dir` - Where export files are written
//! - `min-zoom` / `max-zoom` - Viewport zoom bounds
//!
//! ## Precedence
//!
//! CLI flag > environment > config.kdl > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_DIR_ENV, CONFIG_FILE, ConfigOverrides, ROADMAP_ENV, Resolved, ResolvedConfig,
    ValueSource, get_config_dir, load_config_file, resolve_config, resolve_with,
};
pub use schema::{OutputFormat, PrepmapConfig};
