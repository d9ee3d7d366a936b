//! Roadmap layout generator
//!
//! Places roadmap nodes on a fixed grid and derives the edge set. Phases
//! are columns laid out left to right and nodes are rows in authored order,
//! independent of dependency depth.
//!
//! - Each phase starts with a non-interactive label node at `y = 0`
//! - Content node `i` of a phase sits at `y = (i + 1) * row_spacing + row_margin`
//! - A phase column is `max(node_count, 2) * node_spacing + phase_gutter` wide
//!
//! Edges:
//! - Declared dependencies produce `dep -> node` edges, animated while the
//!   dependency is not done. Dependencies naming unknown nodes are omitted.
//! - Nodes without declared dependencies are chained to the previous node
//!   of their phase with a dashed, static sequential edge.
//!
//! The output depends only on the inputs; regenerating is cheap.

use crate::models::{NodeStatus, ProgressMap, Roadmap, RoadmapNode, RoadmapPhase, effective_status};
use serde::Serialize;
use std::collections::HashMap;

/// 2D position/vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another position
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Role of a node in the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A learning unit with a status control
    #[default]
    Content,
    /// Phase title; a layout anchor that never takes part in edges
    Label,
}

/// Node in the positioned diagram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    /// Node ID (`phase-<id>` for labels)
    pub id: String,
    pub kind: NodeKind,
    pub position: Position,
    /// Owning phase
    pub phase_id: String,
    pub title: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    /// Display status; `None` for label nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

impl LayoutNode {
    /// Label node for a phase
    pub fn label(phase: &RoadmapPhase, position: Position) -> Self {
        Self {
            id: label_id(&phase.id),
            kind: NodeKind::Label,
            position,
            phase_id: phase.id.clone(),
            title: phase.title.clone(),
            tags: Vec::new(),
            estimated_hours: None,
            status: None,
        }
    }

    /// Content node for a roadmap node
    pub fn content(
        phase: &RoadmapPhase,
        node: &RoadmapNode,
        position: Position,
        status: NodeStatus,
    ) -> Self {
        Self {
            id: node.id.clone(),
            kind: NodeKind::Content,
            position,
            phase_id: phase.id.clone(),
            title: node.title.clone(),
            tags: node.tags.clone(),
            estimated_hours: node.estimated_hours,
            status: Some(status),
        }
    }

    pub fn is_label(&self) -> bool {
        self.kind == NodeKind::Label
    }

    /// Whether the node carries `tag`. Label nodes carry no tags.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Id of the label node for a phase
pub fn label_id(phase_id: &str) -> String {
    format!("phase-{}", phase_id)
}

/// Why an edge exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Declared in the node's dependency list
    Dependency,
    /// Fallback chain link to the previous node in the phase
    Sequential,
}

/// Edge in the positioned diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutEdge {
    /// `<source>-<target>`
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    /// Marching animation: the source still blocks the target
    pub animated: bool,
    pub dashed: bool,
}

impl LayoutEdge {
    /// Create a dependency edge
    pub fn dependency(source: impl Into<String>, target: impl Into<String>, animated: bool) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}-{}", source, target),
            source,
            target,
            kind: EdgeKind::Dependency,
            animated,
            dashed: false,
        }
    }

    /// Create a sequential (implicit) edge
    pub fn sequential(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}-{}", source, target),
            source,
            target,
            kind: EdgeKind::Sequential,
            animated: false,
            dashed: true,
        }
    }
}

/// Grid spacing for the layout
///
/// Defaults reproduce the reference diagram exactly; changing them moves
/// every node.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal offset of the first phase
    pub margin: f64,
    /// Width reserved per node slot in a phase column
    pub node_spacing: f64,
    /// Extra space after each phase column
    pub phase_gutter: f64,
    /// Vertical distance between rows
    pub row_spacing: f64,
    /// Extra vertical offset applied to every content row
    pub row_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 50.0,
            node_spacing: 280.0,
            phase_gutter: 150.0,
            row_spacing: 120.0,
            row_margin: 60.0,
        }
    }
}

impl LayoutConfig {
    /// Width of a phase column holding `node_count` nodes
    pub fn phase_width(&self, node_count: usize) -> f64 {
        node_count.max(2) as f64 * self.node_spacing + self.phase_gutter
    }

    /// Vertical position of the content node at `index` within its phase
    pub fn row_y(&self, index: usize) -> f64 {
        (index as f64 + 1.0) * self.row_spacing + self.row_margin
    }
}

/// Axis-aligned bounding box over node positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Positioned nodes and edges
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl Layout {
    /// Get a node by ID
    pub fn get_node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get a mutable node by ID
    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut LayoutNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Get an edge by source and target
    pub fn get_edge(&self, source: &str, target: &str) -> Option<&LayoutEdge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    /// Bounding box of node positions, or `None` for an empty layout
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.nodes.first()?.position;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(self.nodes.iter().fold(init, |b, n| Bounds {
            min_x: b.min_x.min(n.position.x),
            min_y: b.min_y.min(n.position.y),
            max_x: b.max_x.max(n.position.x),
            max_y: b.max_y.max(n.position.y),
        }))
    }
}

/// Generate the diagram with the default grid.
pub fn generate_layout(roadmap: &Roadmap, progress: &ProgressMap) -> Layout {
    generate_layout_with_config(roadmap, progress, &LayoutConfig::default())
}

/// Generate the diagram with a custom grid.
pub fn generate_layout_with_config(
    roadmap: &Roadmap,
    progress: &ProgressMap,
    config: &LayoutConfig,
) -> Layout {
    // Authored status by id; the first definition wins if an id is reused across phases
    let mut authored: HashMap<&str, Option<NodeStatus>> = HashMap::new();
    for (_, node) in roadmap.nodes() {
        authored.entry(node.id.as_str()).or_insert(node.status);
    }

    let mut layout = Layout::default();
    let mut x_offset = config.margin;

    for phase in roadmap.phases() {
        layout
            .nodes
            .push(LayoutNode::label(phase, Position::new(x_offset, 0.0)));

        for (idx, node) in phase.nodes.iter().enumerate() {
            let position = Position::new(x_offset, config.row_y(idx));
            let status = node.effective_status(progress);
            layout
                .nodes
                .push(LayoutNode::content(phase, node, position, status));

            if node.has_declared_dependencies() {
                for dep in node.dependencies() {
                    let Some(dep_authored) = authored.get(dep.as_str()) else {
                        continue;
                    };
                    let dep_status = effective_status(progress.get(dep).copied(), *dep_authored);
                    layout.edges.push(LayoutEdge::dependency(
                        dep.as_str(),
                        node.id.as_str(),
                        dep_status != NodeStatus::Done,
                    ));
                }
            } else if idx > 0 {
                let prev = &phase.nodes[idx - 1];
                layout
                    .edges
                    .push(LayoutEdge::sequential(prev.id.as_str(), node.id.as_str()));
            }
        }

        x_offset += config.phase_width(phase.nodes.len());
    }

    tracing::debug!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        "generated roadmap layout"
    );
    layout
}
