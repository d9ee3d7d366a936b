//! Command implementations for the prepmap CLI.
//!
//! Each command returns a result type implementing [`Output`], so `main`
//! can print it as JSON or as human-readable text.

use crate::config::{ResolvedConfig, ValueSource};
use crate::diagram::render::RenderCommand;
use crate::diagram::renderer::{DiagramRenderer, MinimapEntry, Viewport};
use crate::diagram::theme::{self, LegendEntry};
use crate::diagram::{LayoutConfig, LayoutEdge, LayoutNode, StatusTransitionEngine};
use crate::export::{self, ExportFormat};
use crate::models::{NodeStatus, Roadmap, ValidationIssue};
use crate::progress::{self, PhaseProgress, ProgressSummary};
use crate::storage::ProgressStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

/// Short marker for a status in human output.
fn status_marker(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::NotStarted => "[ ]",
        NodeStatus::InProgress => "[~]",
        NodeStatus::Done => "[x]",
        NodeStatus::Confident => "[*]",
    }
}

fn format_weeks(week_range: Option<(u32, u32)>) -> String {
    match week_range {
        Some((start, end)) if start == end => format!(" (week {})", start),
        Some((start, end)) => format!(" (weeks {}-{})", start, end),
        None => String::new(),
    }
}

/// Load the roadmap named by the resolved config, or the built-in plan.
pub fn load_roadmap(config: &ResolvedConfig) -> Result<Roadmap> {
    match config.roadmap() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading roadmap");
            Roadmap::load(path)
        }
        None => Ok(Roadmap::sample()),
    }
}

/// Where the roadmap came from, for display.
pub fn roadmap_label(config: &ResolvedConfig) -> String {
    config
        .roadmap()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string())
}

fn build_renderer<S: ProgressStore>(
    roadmap: Roadmap,
    store: &S,
    config: &ResolvedConfig,
    filter: Option<String>,
) -> DiagramRenderer {
    let (min_zoom, max_zoom) = config.zoom_range();
    let mut renderer = DiagramRenderer::with_config(
        roadmap,
        &store.load(),
        LayoutConfig::default(),
        Viewport::with_zoom_range(min_zoom, max_zoom),
    );
    renderer.set_tag_filter(filter);
    renderer
}

// === show ===

#[derive(Serialize)]
pub struct ShowResult {
    pub roadmap: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub tags: Vec<String>,
    pub viewport: Viewport,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub legend: Vec<LegendEntry>,
    pub minimap: Vec<MinimapEntry>,
    #[serde(skip)]
    phases: Vec<(String, String, Option<(u32, u32)>)>,
}

impl Output for ShowResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "Roadmap: {} (zoom {:.2})", self.roadmap, self.viewport.zoom);
        if let Some(ref tag) = self.filter {
            let _ = write!(out, ", filter: {}", tag);
        }
        out.push('\n');

        for (phase_id, title, weeks) in &self.phases {
            let nodes: Vec<&LayoutNode> = self
                .nodes
                .iter()
                .filter(|n| !n.is_label() && &n.phase_id == phase_id)
                .collect();
            if nodes.is_empty() && self.filter.is_some() {
                continue;
            }

            let _ = writeln!(out, "\n{}{}", title, format_weeks(*weeks));
            for node in nodes {
                let status = node.status.unwrap_or_default();
                let _ = write!(out, "  {} {} ({})", status_marker(status), node.title, node.id);
                if let Some(hours) = node.estimated_hours {
                    let _ = write!(out, " ~{}h", hours);
                }
                if !node.tags.is_empty() {
                    let _ = write!(out, " [{}]", node.tags.join(", "));
                }
                out.push('\n');
            }
        }

        if !self.edges.is_empty() {
            out.push_str("\nEdges:\n");
            for edge in &self.edges {
                let arrow = if edge.dashed { "-->" } else { "->" };
                let _ = write!(out, "  {} {} {}", edge.source, arrow, edge.target);
                if edge.animated {
                    out.push_str(" (active)");
                }
                out.push('\n');
            }
        }

        let legend: Vec<String> = self
            .legend
            .iter()
            .map(|e| format!("{} {}", status_marker(e.status), e.label))
            .collect();
        let _ = write!(out, "\nLegend: {}", legend.join("  "));
        out
    }
}

/// Lay out the roadmap with the stored progress.
pub fn show<S: ProgressStore>(
    roadmap: Roadmap,
    store: &S,
    config: &ResolvedConfig,
    filter: Option<String>,
    zoom: Option<f64>,
) -> ShowResult {
    let mut renderer = build_renderer(roadmap, store, config, filter);
    if let Some(zoom) = zoom {
        renderer.viewport_mut().set_zoom(zoom);
    }

    ShowResult {
        roadmap: roadmap_label(config),
        filter: renderer.tag_filter().map(str::to_string),
        tags: renderer.available_tags(),
        viewport: renderer.viewport().clone(),
        nodes: renderer.visible_nodes().into_iter().cloned().collect(),
        edges: renderer.edges().to_vec(),
        legend: theme::legend(),
        minimap: renderer.minimap(),
        phases: renderer
            .roadmap()
            .phases()
            .iter()
            .map(|p| (p.id.clone(), p.title.clone(), p.week_range))
            .collect(),
    }
}

// === toggle ===

#[derive(Serialize)]
pub struct ToggleResult {
    pub node_id: String,
    pub title: String,
    pub previous: NodeStatus,
    pub status: NodeStatus,
    /// False when the status could not be written to storage
    pub persisted: bool,
    pub phase: PhaseProgress,
}

impl Output for ToggleResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut out = format!(
            "{} ({}): {} -> {}\n{}: {}% complete",
            self.title,
            self.node_id,
            self.previous.label(),
            self.status.label(),
            self.phase.title,
            self.phase.percentage
        );
        if !self.persisted {
            out.push_str("\nWarning: progress could not be saved");
        }
        out
    }
}

/// Advance one node through the status cycle and persist it.
pub fn toggle<S: ProgressStore>(roadmap: Roadmap, store: &mut S, node_id: &str) -> Result<ToggleResult> {
    let mut renderer = DiagramRenderer::new(roadmap, &store.load());
    if !renderer.click_status(node_id) {
        return Err(Error::NotFound(format!("Node not found: {}", node_id)));
    }

    let change = {
        let mut engine = StatusTransitionEngine::new(&mut *store);
        engine.set_listener(|id, status| {
            tracing::info!(node = %id, status = %status, "status changed");
        });
        engine.process(&mut renderer).into_iter().next()
    }
    .ok_or_else(|| Error::Other(format!("Toggle for {} was not applied", node_id)))?;

    let (phase, node) = renderer
        .roadmap()
        .nodes()
        .find(|(_, n)| n.id == node_id)
        .ok_or_else(|| Error::NotFound(format!("Node not found: {}", node_id)))?;

    let mut progress = store.load();
    progress.insert(change.node_id.clone(), change.status);

    Ok(ToggleResult {
        node_id: change.node_id,
        title: node.title.clone(),
        previous: change.previous,
        status: change.status,
        persisted: change.persisted,
        phase: progress::phase_progress(phase, &progress),
    })
}

// === progress ===

#[derive(Serialize)]
pub struct ProgressResult {
    pub roadmap: String,
    #[serde(flatten)]
    pub summary: ProgressSummary,
}

impl Output for ProgressResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut out = String::new();
        for phase in &self.summary.phases {
            let _ = write!(
                out,
                "{}{}: {}/{} done ({}%)",
                phase.title,
                format_weeks(phase.week_range),
                phase.done,
                phase.total,
                phase.percentage
            );
            if phase.in_progress > 0 {
                let _ = write!(out, ", {} in progress", phase.in_progress);
            }
            if phase.remaining_hours > 0.0 {
                let _ = write!(out, ", ~{}h remaining", phase.remaining_hours);
            }
            out.push('\n');
        }
        let _ = write!(
            out,
            "Overall: {}/{} done ({}%)",
            self.summary.done, self.summary.total, self.summary.percentage
        );
        out
    }
}

/// Per-phase completion for the roadmap.
pub fn show_progress<S: ProgressStore>(roadmap: &Roadmap, store: &S, config: &ResolvedConfig) -> ProgressResult {
    ProgressResult {
        roadmap: roadmap_label(config),
        summary: progress::summarize(roadmap, &store.load()),
    }
}

// === export ===

#[derive(Serialize)]
pub struct ExportResult {
    pub format: ExportFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Informational message when the format has no exporter yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl Output for ExportResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        match (&self.path, &self.notice) {
            (Some(path), _) => format!(
                "Exported {} to {}",
                self.format.display_name(),
                path.display()
            ),
            (None, Some(notice)) => format!("Notice: {}", notice),
            (None, None) => format!("Nothing exported for {}", self.format.display_name()),
        }
    }
}

/// Export the roadmap and progress into `dir`.
///
/// Formats without an exporter produce a notice instead of an error.
pub fn export_roadmap<S: ProgressStore>(
    roadmap: &Roadmap,
    store: &S,
    format: ExportFormat,
    dir: &Path,
    now: DateTime<Utc>,
) -> Result<ExportResult> {
    match export::export(format, roadmap, &store.load(), now) {
        Ok(artifact) => Ok(ExportResult {
            format,
            path: Some(export::write_export(dir, &artifact)?),
            notice: None,
        }),
        Err(e @ Error::ExportUnavailable(_)) => {
            tracing::info!(format = %format, "export format not available");
            Ok(ExportResult {
                format,
                path: None,
                notice: Some(e.to_string()),
            })
        }
        Err(e) => Err(e),
    }
}

// === render ===

#[derive(Serialize)]
pub struct RenderResult {
    pub width: f64,
    pub height: f64,
    pub viewport: Viewport,
    pub commands: Vec<RenderCommand>,
}

impl Output for RenderResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        format!(
            "{} draw commands for a {}x{} canvas (zoom {:.2}, pan {:.0},{:.0})",
            self.commands.len(),
            self.width,
            self.height,
            self.viewport.zoom,
            self.viewport.pan.x,
            self.viewport.pan.y
        )
    }
}

/// Fit the diagram to a canvas and emit its draw commands.
pub fn render<S: ProgressStore>(
    roadmap: Roadmap,
    store: &S,
    config: &ResolvedConfig,
    filter: Option<String>,
    width: f64,
    height: f64,
) -> Result<RenderResult> {
    if !(width > 0.0 && height > 0.0) {
        return Err(Error::InvalidInput(format!(
            "Canvas size must be positive, got {}x{}",
            width, height
        )));
    }

    let mut renderer = build_renderer(roadmap, store, config, filter);
    renderer.fit_view(width, height);
    Ok(RenderResult {
        width,
        height,
        viewport: renderer.viewport().clone(),
        commands: renderer.render(),
    })
}

// === validate ===

#[derive(Serialize)]
pub struct ValidateResult {
    pub valid: bool,
    pub phases: usize,
    pub nodes: usize,
    pub issues: Vec<ValidationIssue>,
}

impl Output for ValidateResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        if self.valid {
            return format!("Roadmap OK: {} phases, {} nodes", self.phases, self.nodes);
        }
        let mut out = format!("{} issue(s) found:", self.issues.len());
        for issue in &self.issues {
            let _ = write!(out, "\n  - {}", issue);
        }
        out
    }
}

/// Report data-integrity problems in the roadmap.
pub fn validate(roadmap: &Roadmap) -> ValidateResult {
    let issues = roadmap.validate();
    ValidateResult {
        valid: issues.is_empty(),
        phases: roadmap.phases().len(),
        nodes: roadmap.nodes().count(),
        issues,
    }
}

// === reset ===

#[derive(Serialize)]
pub struct ResetResult {
    pub cleared: usize,
}

impl Output for ResetResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        format!("Cleared progress for {} node(s)", self.cleared)
    }
}

/// Remove all stored progress.
pub fn reset<S: ProgressStore>(store: &mut S) -> Result<ResetResult> {
    let cleared = store.load().len();
    store.clear()?;
    Ok(ResetResult { cleared })
}

// === config show ===

#[derive(Serialize)]
pub struct ConfigShowResult {
    #[serde(flatten)]
    pub config: ResolvedConfig,
}

impl Output for ConfigShowResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        fn line(out: &mut String, key: &str, value: impl std::fmt::Display, source: &ValueSource) {
            let _ = writeln!(out, "{:<14} {} ({})", key, value, source);
        }

        let c = &self.config;
        let mut out = String::new();
        line(&mut out, "output-format", c.output_format.value, &c.output_format.source);
        match c.roadmap {
            Some(ref r) => line(&mut out, "roadmap", r.value.display(), &r.source),
            None => line(&mut out, "roadmap", "built-in", &ValueSource::Default),
        }
        match c.export_dir {
            Some(ref r) => line(&mut out, "export-dir", r.value.display(), &r.source),
            None => line(&mut out, "export-dir", ".", &ValueSource::Default),
        }
        line(&mut out, "min-zoom", c.min_zoom.value, &c.min_zoom.source);
        line(&mut out, "max-zoom", c.max_zoom.value, &c.max_zoom.source);
        if let Some(ref path) = c.config_path {
            let _ = writeln!(out, "\nLoaded from {}", path.display());
        }
        out.trim_end().to_string()
    }
}

pub fn config_show(config: &ResolvedConfig) -> ConfigShowResult {
    ConfigShowResult {
        config: config.clone(),
    }
}
