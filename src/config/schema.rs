//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The Rust struct representing the KDL schema
//! - Serialization/deserialization to/from KDL format
//! - Validation
//! - Default values

use crate::diagram::renderer::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// output-format "human"  // or "json"
/// roadmap "/path/to/roadmap.json"
/// export-dir "/path/to/exports"
/// min-zoom 0.5
/// max-zoom 1.5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrepmapConfig {
    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Roadmap definition file; the built-in plan is used when unset
    pub roadmap: Option<PathBuf>,

    /// Directory export files are written to
    pub export_dir: Option<PathBuf>,

    /// Lower zoom bound for the diagram viewport
    pub min_zoom: Option<f64>,

    /// Upper zoom bound for the diagram viewport
    pub max_zoom: Option<f64>,
}

/// Read the first argument of `name` as a string.
fn string_value(doc: &KdlDocument, name: &str) -> Option<String> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .and_then(|entry| entry.value().as_string())
        .map(str::to_string)
}

/// Read the first argument of `name` as a positive number. Integers are accepted.
fn zoom_value(doc: &KdlDocument, name: &str) -> Option<f64> {
    let value = doc.get(name)?.entries().first()?.value();
    let zoom = match value {
        KdlValue::Float(f) => *f,
        KdlValue::Integer(i) => *i as f64,
        _ => return None,
    };
    (zoom.is_finite() && zoom > 0.0).then_some(zoom)
}

impl PrepmapConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        let min = self.min_zoom.unwrap_or(DEFAULT_MIN_ZOOM);
        let max = self.max_zoom.unwrap_or(DEFAULT_MAX_ZOOM);
        if min > max {
            return Err(format!(
                "min-zoom ({}) must not exceed max-zoom ({})",
                min, max
            ));
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown nodes and invalid values are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        Self {
            output_format: string_value(doc, "output-format")
                .and_then(|s| OutputFormat::parse(&s)),
            roadmap: string_value(doc, "roadmap").map(PathBuf::from),
            export_dir: string_value(doc, "export-dir").map(PathBuf::from),
            min_zoom: zoom_value(doc, "min-zoom"),
            max_zoom: zoom_value(doc, "max-zoom"),
        }
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        let mut push = |name: &str, value: KdlValue| {
            let mut node = KdlNode::new(name);
            node.push(KdlEntry::new(value));
            doc.nodes_mut().push(node);
        };

        if let Some(format) = self.output_format {
            push("output-format", KdlValue::String(format.as_str().to_string()));
        }
        if let Some(ref path) = self.roadmap {
            push("roadmap", KdlValue::String(path.display().to_string()));
        }
        if let Some(ref path) = self.export_dir {
            push("export-dir", KdlValue::String(path.display().to_string()));
        }
        if let Some(zoom) = self.min_zoom {
            push("min-zoom", KdlValue::Float(zoom));
        }
        if let Some(zoom) = self.max_zoom {
            push("max-zoom", KdlValue::Float(zoom));
        }

        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("HUMAN"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }

    #[test]
    fn test_config_from_kdl() {
        let kdl = r#"
            output-format "human"
            roadmap "/tmp/plan.json"
            export-dir "/tmp/out"
            min-zoom 0.25
            max-zoom 2
        "#;
        let doc: KdlDocument = kdl.parse().unwrap();
        let config = PrepmapConfig::from_kdl(&doc);

        assert_eq!(config.output_format, Some(OutputFormat::Human));
        assert_eq!(config.roadmap, Some(PathBuf::from("/tmp/plan.json")));
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.min_zoom, Some(0.25));
        assert_eq!(config.max_zoom, Some(2.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_ignores_invalid_values() {
        let kdl = r#"
            output-format "yaml"
            min-zoom -1.0
            max-zoom "big"
            editor "vim"
        "#;
        let doc: KdlDocument = kdl.parse().unwrap();
        assert_eq!(PrepmapConfig::from_kdl(&doc), PrepmapConfig::new());
    }

    #[test]
    fn test_config_roundtrip_kdl() {
        let config = PrepmapConfig {
            output_format: Some(OutputFormat::Human),
            roadmap: Some(PathBuf::from("plan.json")),
            export_dir: None,
            min_zoom: Some(0.75),
            max_zoom: Some(1.25),
        };
        let doc: KdlDocument = config.to_kdl().to_string().parse().unwrap();
        assert_eq!(PrepmapConfig::from_kdl(&doc), config);
    }

    #[test]
    fn test_validate_zoom_range() {
        let config = PrepmapConfig {
            min_zoom: Some(2.0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("min-zoom"));

        let config = PrepmapConfig {
            max_zoom: Some(0.4),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
