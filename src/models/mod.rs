//! Data models for prepmap roadmaps.
//!
//! This module defines the core data structures:
//! - `NodeStatus` - Completion state of a single learning unit
//! - `RoadmapNode` - A learning unit with tags, effort estimate, and dependencies
//! - `RoadmapPhase` - An ordered group of nodes (one stage of preparation)
//! - `Roadmap` - The full ordered phase sequence, as authored by the content provider
//! - `ProgressMap` - Node id to status mapping kept by the progress store

pub mod sample;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;

/// Node status in the learning workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
    /// Already known before starting the plan. Only reachable from authored data.
    Confident,
}

impl NodeStatus {
    /// All statuses in legend order.
    pub const ALL: [NodeStatus; 4] = [
        NodeStatus::NotStarted,
        NodeStatus::InProgress,
        NodeStatus::Done,
        NodeStatus::Confident,
    ];

    /// Parse a status from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "not_started" | "not-started" => Some(Self::NotStarted),
            "in_progress" | "in-progress" | "inprogress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            "confident" => Some(Self::Confident),
            _ => None,
        }
    }

    /// Wire representation (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Confident => "confident",
        }
    }

    /// Label shown in the legend.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Done => "Completed",
            Self::Confident => "Already Confident",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NodeStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::InvalidInput(format!("Invalid status: {}", s)))
    }
}

/// Resolve the status used for display, aggregation, and export.
///
/// Precedence: stored progress > authored status > `not_started`.
pub fn effective_status(stored: Option<NodeStatus>, authored: Option<NodeStatus>) -> NodeStatus {
    stored.or(authored).unwrap_or_default()
}

/// Mapping from node id to status, as persisted by the progress store.
pub type ProgressMap = BTreeMap<String, NodeStatus>;

/// External study material attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub label: String,
    pub url: String,
}

/// A single learning unit in the roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapNode {
    /// Unique identifier across the whole roadmap (e.g., "arrays-strings")
    pub id: String,

    /// Display title
    pub title: String,

    /// Tags for categorization and filtering
    #[serde(default)]
    pub tags: Vec<String>,

    /// Estimated effort in hours
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    /// Study links
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceLink>,

    /// Node ids that should be completed first.
    ///
    /// `Some(vec![])` still counts as "declared" and suppresses the implicit
    /// sequential edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,

    /// Authored initial status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

impl RoadmapNode {
    /// Create a new node with the given id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tags: Vec::new(),
            estimated_hours: None,
            resources: Vec::new(),
            depends_on: None,
            status: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = Some(deps.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_resource(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.resources.push(ResourceLink {
            label: label.into(),
            url: url.into(),
        });
        self
    }

    /// Whether the node declares an explicit dependency list.
    pub fn has_declared_dependencies(&self) -> bool {
        self.depends_on.is_some()
    }

    /// Declared dependency ids (empty when none were declared).
    pub fn dependencies(&self) -> &[String] {
        self.depends_on.as_deref().unwrap_or(&[])
    }

    /// Effective status of this node given the stored progress.
    pub fn effective_status(&self, progress: &ProgressMap) -> NodeStatus {
        effective_status(progress.get(&self.id).copied(), self.status)
    }
}

/// A named, ordered group of roadmap nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhase {
    pub id: String,

    pub title: String,

    /// Inclusive week range, e.g. `[3, 5]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_range: Option<(u32, u32)>,

    /// Nodes in authored order
    #[serde(default)]
    pub nodes: Vec<RoadmapNode>,
}

impl RoadmapPhase {
    /// Create an empty phase.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            week_range: None,
            nodes: Vec::new(),
        }
    }

    pub fn with_weeks(mut self, start: u32, end: u32) -> Self {
        self.week_range = Some((start, end));
        self
    }

    pub fn with_node(mut self, node: RoadmapNode) -> Self {
        self.nodes.push(node);
        self
    }
}

/// A data-integrity problem found in an authored roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// Node id repeated inside one phase; later copies were ignored.
    DuplicateInPhase { phase_id: String, node_id: String },
    /// Node id used in more than one phase.
    DuplicateAcrossPhases {
        node_id: String,
        first_phase: String,
        second_phase: String,
    },
    /// Dependency names a node that does not exist; its edge is omitted.
    DanglingDependency { node_id: String, dependency: String },
    /// Week range is zero-based or ends before it starts.
    InvalidWeekRange { phase_id: String, start: u32, end: u32 },
    /// Estimated hours must be a positive number.
    InvalidEstimate { node_id: String, hours: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateInPhase { phase_id, node_id } => write!(
                f,
                "node '{}' appears more than once in phase '{}' (later copies ignored)",
                node_id, phase_id
            ),
            Self::DuplicateAcrossPhases {
                node_id,
                first_phase,
                second_phase,
            } => write!(
                f,
                "node '{}' appears in both phase '{}' and phase '{}'",
                node_id, first_phase, second_phase
            ),
            Self::DanglingDependency {
                node_id,
                dependency,
            } => write!(
                f,
                "node '{}' depends on unknown node '{}'",
                node_id, dependency
            ),
            Self::InvalidWeekRange {
                phase_id,
                start,
                end,
            } => write!(
                f,
                "phase '{}' has invalid week range [{}, {}]",
                phase_id, start, end
            ),
            Self::InvalidEstimate { node_id, hours } => write!(
                f,
                "node '{}' has non-positive estimated hours ({})",
                node_id, hours
            ),
        }
    }
}

/// On-disk shapes accepted for a roadmap file.
#[derive(Deserialize)]
#[serde(untagged)]
enum RoadmapFile {
    Phases(Vec<RoadmapPhase>),
    Wrapped { phases: Vec<RoadmapPhase> },
}

/// The full roadmap: an ordered sequence of phases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roadmap {
    phases: Vec<RoadmapPhase>,
    /// Duplicates dropped while building
    ignored: Vec<ValidationIssue>,
}

impl Roadmap {
    /// Build a roadmap, ignoring nodes whose id repeats within the same phase.
    pub fn new(phases: Vec<RoadmapPhase>) -> Self {
        let mut ignored = Vec::new();
        let phases = phases
            .into_iter()
            .map(|mut phase| {
                let mut seen = HashSet::new();
                let phase_id = phase.id.clone();
                phase.nodes.retain(|node| {
                    if seen.insert(node.id.clone()) {
                        true
                    } else {
                        tracing::warn!(phase = %phase_id, node = %node.id, "ignoring duplicate node");
                        ignored.push(ValidationIssue::DuplicateInPhase {
                            phase_id: phase_id.clone(),
                            node_id: node.id.clone(),
                        });
                        false
                    }
                });
                phase
            })
            .collect();

        Self { phases, ignored }
    }

    /// Parse a roadmap from JSON: either a bare phase array or `{ "phases": [...] }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: RoadmapFile = serde_json::from_str(json)?;
        let phases = match file {
            RoadmapFile::Phases(phases) => phases,
            RoadmapFile::Wrapped { phases } => phases,
        };
        Ok(Self::new(phases))
    }

    /// Load a roadmap file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("roadmap file {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_json(&contents)
    }

    pub fn phases(&self) -> &[RoadmapPhase] {
        &self.phases
    }

    /// Iterate over every node with its phase, in authored order.
    pub fn nodes(&self) -> impl Iterator<Item = (&RoadmapPhase, &RoadmapNode)> {
        self.phases
            .iter()
            .flat_map(|phase| phase.nodes.iter().map(move |node| (phase, node)))
    }

    /// Find a node anywhere in the roadmap.
    pub fn find_node(&self, id: &str) -> Option<&RoadmapNode> {
        self.nodes().map(|(_, node)| node).find(|node| node.id == id)
    }

    /// Unique tags in first-seen order.
    pub fn all_tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.nodes()
            .flat_map(|(_, node)| node.tags.iter())
            .filter(|tag| seen.insert(tag.as_str()))
            .cloned()
            .collect()
    }

    /// Check the data-integrity invariants. Never fails; problems are reported.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = self.ignored.clone();
        let mut owner: HashMap<&str, &str> = HashMap::new();

        for phase in &self.phases {
            if let Some((start, end)) = phase.week_range {
                if start == 0 || start > end {
                    issues.push(ValidationIssue::InvalidWeekRange {
                        phase_id: phase.id.clone(),
                        start,
                        end,
                    });
                }
            }

            for node in &phase.nodes {
                if let Some(first) = owner.insert(node.id.as_str(), phase.id.as_str()) {
                    issues.push(ValidationIssue::DuplicateAcrossPhases {
                        node_id: node.id.clone(),
                        first_phase: first.to_string(),
                        second_phase: phase.id.clone(),
                    });
                }
                if let Some(hours) = node.estimated_hours {
                    if !(hours > 0.0) {
                        issues.push(ValidationIssue::InvalidEstimate {
                            node_id: node.id.clone(),
                            hours: hours.to_string(),
                        });
                    }
                }
            }
        }

        for (_, node) in self.nodes() {
            for dep in node.dependencies() {
                if !owner.contains_key(dep.as_str()) {
                    issues.push(ValidationIssue::DanglingDependency {
                        node_id: node.id.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        issues
    }
}
