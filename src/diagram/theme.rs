//! Theme constants for the roadmap diagram
//!
//! Colors for nodes by status, phase labels, edges, the minimap, and the legend.

use super::layout::EdgeKind;
use crate::models::NodeStatus;
use serde::Serialize;

/// Canvas colors
pub mod background {
    /// Canvas background
    pub const CANVAS: &str = "#f8fafc";
    /// Default card background (not started)
    pub const CARD: &str = "#ffffff";
    /// Tag badge background
    pub const BADGE: &str = "#f1f5f9";
}

/// Text colors
pub mod text {
    pub const PRIMARY: &str = "#0f172a";
    /// Muted text (estimates, not-started icon)
    pub const MUTED: &str = "#64748b";
    /// Text on the primary color
    pub const ON_PRIMARY: &str = "#ffffff";
}

/// Border colors
pub mod border {
    pub const DEFAULT: &str = "#e2e8f0";
}

/// Phase label node colors
pub mod label {
    pub const BACKGROUND: &str = "#2563eb";
}

/// Node colors by status
pub mod status {
    pub const DONE_FILL: &str = "#f0fdf4";
    pub const DONE_BORDER: &str = "#22c55e";
    pub const DONE_ICON: &str = "#16a34a";

    pub const IN_PROGRESS_FILL: &str = "#fefce8";
    pub const IN_PROGRESS_BORDER: &str = "#eab308";
    pub const IN_PROGRESS_ICON: &str = "#ca8a04";

    pub const CONFIDENT_FILL: &str = "#eff6ff";
    pub const CONFIDENT_BORDER: &str = "#3b82f6";
    pub const CONFIDENT_ICON: &str = "#2563eb";

    /// Confident nodes are drawn faded
    pub const CONFIDENT_ALPHA: f64 = 0.6;
}

/// Minimap node colors
pub mod minimap {
    pub const DONE: &str = "#16a34a";
    pub const IN_PROGRESS: &str = "#ca8a04";
    pub const CONFIDENT: &str = "#2563eb";
    pub const DEFAULT: &str = "#94a3b8";
}

/// Edge colors
pub mod edge {
    /// Declared dependency edges
    pub const DEPENDENCY: &str = "#2563eb";
    /// Sequential fallback edges
    pub const SEQUENTIAL: &str = "#64748b";
}

/// Fill color for a content node
pub fn status_fill(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Done => status::DONE_FILL,
        NodeStatus::InProgress => status::IN_PROGRESS_FILL,
        NodeStatus::Confident => status::CONFIDENT_FILL,
        NodeStatus::NotStarted => background::CARD,
    }
}

/// Border color for a content node
pub fn status_border(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Done => status::DONE_BORDER,
        NodeStatus::InProgress => status::IN_PROGRESS_BORDER,
        NodeStatus::Confident => status::CONFIDENT_BORDER,
        NodeStatus::NotStarted => border::DEFAULT,
    }
}

/// Color of the clickable status icon
pub fn status_icon(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Done => status::DONE_ICON,
        NodeStatus::InProgress => status::IN_PROGRESS_ICON,
        NodeStatus::Confident => status::CONFIDENT_ICON,
        NodeStatus::NotStarted => text::MUTED,
    }
}

/// Minimap color; label nodes (no status) use the default
pub fn minimap_color(status: Option<NodeStatus>) -> &'static str {
    match status {
        Some(NodeStatus::Done) => minimap::DONE,
        Some(NodeStatus::InProgress) => minimap::IN_PROGRESS,
        Some(NodeStatus::Confident) => minimap::CONFIDENT,
        _ => minimap::DEFAULT,
    }
}

/// Stroke color for an edge
pub fn edge_color(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Dependency => edge::DEPENDENCY,
        EdgeKind::Sequential => edge::SEQUENTIAL,
    }
}

/// One row of the status legend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub status: NodeStatus,
    pub label: &'static str,
    pub color: &'static str,
}

/// Legend rows in display order
pub fn legend() -> Vec<LegendEntry> {
    NodeStatus::ALL
        .iter()
        .map(|&status| LegendEntry {
            status,
            label: status.label(),
            color: status_icon(status),
        })
        .collect()
}
