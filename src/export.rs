//! Export of the roadmap and its progress to portable files.
//!
//! JSON and CSV are implemented. PNG and PDF are accepted formats that always
//! report [`Error::ExportUnavailable`], so callers can show a notice instead
//! of silently doing nothing.

use crate::models::{ProgressMap, Roadmap};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// CSV header row.
pub const CSV_HEADER: &str = "Phase,Node Title,Tags,Estimated Hours,Status";

/// Export formats offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }

    /// Display name used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Png => "PNG",
            Self::Pdf => "PDF",
        }
    }

    /// Whether an exporter exists for this format.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Json | Self::Csv)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            Error::InvalidInput(format!(
                "Invalid export format: {} (expected json, csv, png, or pdf)",
                s
            ))
        })
    }
}

/// A generated export, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: String,
    pub contents: String,
}

impl ExportArtifact {
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }
}

/// `roadmap-<unix-millis>.<ext>`
pub fn export_filename(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!("roadmap-{}.{}", now.timestamp_millis(), format.extension())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    phases: &'a [crate::models::RoadmapPhase],
    progress: &'a ProgressMap,
    exported_at: String,
}

/// Pretty-printed `{ phases, progress, exportedAt }`.
pub fn export_json(roadmap: &Roadmap, progress: &ProgressMap, now: DateTime<Utc>) -> Result<String> {
    let doc = JsonExport {
        phases: roadmap.phases(),
        progress,
        exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// One row per node in roadmap order, with the effective status.
pub fn export_csv(roadmap: &Roadmap, progress: &ProgressMap) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for (phase, node) in roadmap.nodes() {
        let hours = node
            .estimated_hours
            .map(|h| h.to_string())
            .unwrap_or_default();
        let row = [
            quote(&phase.title),
            quote(&node.title),
            quote(&node.tags.join("; ")),
            hours,
            node.effective_status(progress).to_string(),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

/// Produce an artifact for `format`.
///
/// Returns [`Error::ExportUnavailable`] for PNG and PDF.
pub fn export(
    format: ExportFormat,
    roadmap: &Roadmap,
    progress: &ProgressMap,
    now: DateTime<Utc>,
) -> Result<ExportArtifact> {
    let contents = match format {
        ExportFormat::Json => export_json(roadmap, progress, now)?,
        ExportFormat::Csv => export_csv(roadmap, progress),
        ExportFormat::Png | ExportFormat::Pdf => {
            return Err(Error::ExportUnavailable(format.display_name()));
        }
    };

    Ok(ExportArtifact {
        format,
        filename: export_filename(format, now),
        contents,
    })
}

/// Write an artifact into `dir`, creating the directory if needed.
pub fn write_export(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.filename);
    std::fs::write(&path, &artifact.contents)?;
    tracing::info!(path = %path.display(), format = %artifact.format, "wrote export");
    Ok(path)
}
