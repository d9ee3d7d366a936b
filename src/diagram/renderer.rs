//! Interactive diagram state.
//!
//! `DiagramRenderer` owns the positioned diagram, the viewport (pan and
//! clamped zoom), and the tag filter. It never changes node status by
//! itself: a click on a status control queues a [`DiagramEvent`], and the
//! status transition engine applies it.

use super::layout::{self, EdgeKind, Layout, LayoutConfig, LayoutEdge, LayoutNode, Position};
use super::render::{self, NodeStyle, RenderCommand};
use super::theme;
use crate::models::{NodeStatus, ProgressMap, Roadmap};
use serde::Serialize;
use std::collections::HashSet;

/// Default zoom bounds
pub const DEFAULT_MIN_ZOOM: f64 = 0.5;
pub const DEFAULT_MAX_ZOOM: f64 = 1.5;

/// Fraction of the view kept empty around the diagram by `fit_view`
const FIT_PADDING: f64 = 0.1;

/// Events raised by user interaction with the diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagramEvent {
    /// The status control of a content node was clicked
    NodeToggled { node_id: String },
}

/// Pan and zoom state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    /// Screen-space offset of the world origin
    pub pan: Position,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::with_zoom_range(DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM)
    }
}

impl Viewport {
    /// Create a viewport with custom zoom bounds (swapped if given backwards)
    pub fn with_zoom_range(min_zoom: f64, max_zoom: f64) -> Self {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        Self {
            pan: Position::default(),
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
        }
    }

    /// Set the zoom level, clamped to the bounds
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    /// Multiply the zoom level, clamped to the bounds
    pub fn zoom_by(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// World to screen coordinates
    pub fn to_screen(&self, world: Position) -> Position {
        Position::new(
            world.x * self.zoom + self.pan.x,
            world.y * self.zoom + self.pan.y,
        )
    }

    /// Screen to world coordinates
    pub fn to_world(&self, screen: Position) -> Position {
        Position::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }
}

/// Interactive roadmap diagram
#[derive(Debug, Clone)]
pub struct DiagramRenderer {
    roadmap: Roadmap,
    layout: Layout,
    layout_config: LayoutConfig,
    viewport: Viewport,
    style: NodeStyle,
    tag_filter: Option<String>,
    events: Vec<DiagramEvent>,
}

impl DiagramRenderer {
    /// Build the diagram for a roadmap and the current stored progress
    pub fn new(roadmap: Roadmap, progress: &ProgressMap) -> Self {
        Self::with_config(roadmap, progress, LayoutConfig::default(), Viewport::default())
    }

    pub fn with_config(
        roadmap: Roadmap,
        progress: &ProgressMap,
        layout_config: LayoutConfig,
        viewport: Viewport,
    ) -> Self {
        let layout = layout::generate_layout_with_config(&roadmap, progress, &layout_config);
        Self {
            roadmap,
            layout,
            layout_config,
            viewport,
            style: NodeStyle::default(),
            tag_filter: None,
            events: Vec::new(),
        }
    }

    /// Replace the roadmap definition and resynchronize statuses from the store
    pub fn set_roadmap(&mut self, roadmap: Roadmap, progress: &ProgressMap) {
        self.roadmap = roadmap;
        self.refresh(progress);
    }

    /// Regenerate the layout from the current roadmap and stored progress
    pub fn refresh(&mut self, progress: &ProgressMap) {
        self.layout =
            layout::generate_layout_with_config(&self.roadmap, progress, &self.layout_config);
    }

    pub fn roadmap(&self) -> &Roadmap {
        &self.roadmap
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    /// All edges, including those touching filtered-out nodes
    pub fn edges(&self) -> &[LayoutEdge] {
        &self.layout.edges
    }

    /// Tags available for filtering, in first-seen order
    pub fn available_tags(&self) -> Vec<String> {
        self.roadmap.all_tags()
    }

    pub fn tag_filter(&self) -> Option<&str> {
        self.tag_filter.as_deref()
    }

    /// Show only nodes carrying `tag` (`None` shows everything).
    ///
    /// Visual only: layout and edges are untouched. Label nodes carry no
    /// tags, so they are hidden while a filter is active.
    pub fn set_tag_filter(&mut self, tag: Option<String>) {
        self.tag_filter = tag;
    }

    /// Nodes passing the tag filter
    pub fn visible_nodes(&self) -> Vec<&LayoutNode> {
        match self.tag_filter.as_deref() {
            Some(tag) => self.layout.nodes.iter().filter(|n| n.has_tag(tag)).collect(),
            None => self.layout.nodes.iter().collect(),
        }
    }

    /// Display status of a content node
    pub fn node_status(&self, node_id: &str) -> Option<NodeStatus> {
        self.layout.get_node(node_id).and_then(|n| n.status)
    }

    /// Update the cached display status of a content node, along with the
    /// animation of the dependency edges leaving it.
    ///
    /// Returns `false` for label or unknown nodes.
    pub fn apply_status(&mut self, node_id: &str, status: NodeStatus) -> bool {
        match self.layout.get_node_mut(node_id) {
            Some(node) if !node.is_label() => node.status = Some(status),
            _ => return false,
        }

        for edge in self
            .layout
            .edges
            .iter_mut()
            .filter(|e| e.source == node_id && e.kind == EdgeKind::Dependency)
        {
            edge.animated = status != NodeStatus::Done;
        }
        true
    }

    /// Click on a node's status control. Label and unknown nodes are not interactive.
    pub fn click_status(&mut self, node_id: &str) -> bool {
        let interactive = self
            .layout
            .get_node(node_id)
            .is_some_and(|n| !n.is_label());
        if interactive {
            self.events.push(DiagramEvent::NodeToggled {
                node_id: node_id.to_string(),
            });
        }
        interactive
    }

    /// Topmost visible node under a screen-space point
    pub fn node_at(&self, screen: Position) -> Option<&LayoutNode> {
        let world = self.viewport.to_world(screen);
        self.visible_nodes()
            .into_iter()
            .rev()
            .find(|n| self.style.contains(n, world))
    }

    /// Click at a screen-space point; toggles the node's status if its icon was hit
    pub fn click_at(&mut self, screen: Position) -> bool {
        let world = self.viewport.to_world(screen);
        let hit = self.node_at(screen).and_then(|node| {
            let icon = self.style.icon_center(node);
            (!node.is_label() && icon.distance(&world) <= self.style.icon_radius * 1.5)
                .then(|| node.id.clone())
        });
        match hit {
            Some(id) => self.click_status(&id),
            None => false,
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<DiagramEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fit the whole diagram into a `width` x `height` view, respecting zoom bounds
    pub fn fit_view(&mut self, width: f64, height: f64) {
        let Some(bounds) = self.layout.bounds() else {
            return;
        };
        let content_w = bounds.width() + self.style.width;
        let content_h = bounds.height() + self.style.height;
        let scale = 1.0 + 2.0 * FIT_PADDING;
        let zoom = (width / (content_w * scale)).min(height / (content_h * scale));
        self.viewport.set_zoom(zoom);

        let zoom = self.viewport.zoom;
        let center = Position::new(
            bounds.min_x + content_w / 2.0,
            bounds.min_y + content_h / 2.0,
        );
        self.viewport.pan = Position::new(width / 2.0 - center.x * zoom, height / 2.0 - center.y * zoom);
    }

    /// Produce drawing commands for the current state.
    ///
    /// Edges are drawn only when both endpoints are visible.
    pub fn render(&self) -> Vec<RenderCommand> {
        let visible = self.visible_nodes();
        let visible_ids: HashSet<&str> = visible.iter().map(|n| n.id.as_str()).collect();

        let mut commands = vec![
            RenderCommand::Clear {
                color: theme::background::CANVAS.to_string(),
            },
            RenderCommand::Save,
            RenderCommand::Translate {
                x: self.viewport.pan.x,
                y: self.viewport.pan.y,
            },
            RenderCommand::Scale {
                x: self.viewport.zoom,
                y: self.viewport.zoom,
            },
        ];

        for edge in &self.layout.edges {
            if !visible_ids.contains(edge.source.as_str()) || !visible_ids.contains(edge.target.as_str()) {
                continue;
            }
            if let (Some(source), Some(target)) = (
                self.layout.get_node(&edge.source),
                self.layout.get_node(&edge.target),
            ) {
                commands.extend(render::render_edge(edge, source, target, &self.style));
            }
        }

        for node in visible {
            commands.extend(render::render_node(node, &self.style));
        }

        commands.push(RenderCommand::Restore);
        commands
    }

    /// Minimap dots for visible nodes
    pub fn minimap(&self) -> Vec<MinimapEntry> {
        self.visible_nodes()
            .into_iter()
            .map(|n| MinimapEntry {
                id: n.id.clone(),
                position: n.position,
                color: theme::minimap_color(n.status),
            })
            .collect()
    }
}

/// One dot on the minimap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimapEntry {
    pub id: String,
    pub position: Position,
    pub color: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{chain_roadmap, sequential_roadmap};

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(10.0);
        assert_eq!(viewport.zoom, 1.5);
        viewport.zoom_by(0.01);
        assert_eq!(viewport.zoom, 0.5);
        viewport.set_zoom(f64::NAN);
        assert_eq!(viewport.zoom, 0.5);
    }

    #[test]
    fn test_zoom_range_normalized() {
        let viewport = Viewport::with_zoom_range(2.0, 1.2);
        assert_eq!(viewport.min_zoom, 1.2);
        assert_eq!(viewport.max_zoom, 2.0);
        assert_eq!(viewport.zoom, 1.2);
    }

    #[test]
    fn test_screen_world_round_trip() {
        let mut viewport = Viewport::default();
        viewport.pan_by(100.0, -40.0);
        viewport.set_zoom(1.25);
        let world = Position::new(50.0, 180.0);
        let back = viewport.to_world(viewport.to_screen(world));
        assert!((back.x - world.x).abs() < 1e-9);
        assert!((back.y - world.y).abs() < 1e-9);
    }

    #[test]
    fn test_filter_is_visual_only() {
        let mut renderer = DiagramRenderer::new(sequential_roadmap(), &ProgressMap::new());
        let edges_before = renderer.edges().to_vec();

        renderer.set_tag_filter(Some("SQL".to_string()));
        let visible: Vec<_> = renderer.visible_nodes().iter().map(|n| n.id.clone()).collect();
        assert_eq!(visible, ["s3"]);
        assert_eq!(renderer.edges(), edges_before.as_slice());

        renderer.set_tag_filter(None);
        assert_eq!(renderer.visible_nodes().len(), 4);
    }

    #[test]
    fn test_filter_hides_phase_labels() {
        let mut renderer = DiagramRenderer::new(sequential_roadmap(), &ProgressMap::new());
        renderer.set_tag_filter(Some("Core".to_string()));
        assert!(renderer.visible_nodes().iter().all(|n| !n.is_label()));
        assert_eq!(renderer.visible_nodes().len(), 2);
    }

    #[test]
    fn test_click_status_queues_event() {
        let mut renderer = DiagramRenderer::new(chain_roadmap(), &ProgressMap::new());
        assert!(renderer.click_status("A"));
        assert!(!renderer.click_status("phase-p1"));
        assert!(!renderer.click_status("missing"));
        assert_eq!(
            renderer.drain_events(),
            vec![DiagramEvent::NodeToggled {
                node_id: "A".to_string()
            }]
        );
        assert!(renderer.drain_events().is_empty());
        // Clicking never changes status by itself
        assert_eq!(renderer.node_status("A"), Some(NodeStatus::NotStarted));
    }

    #[test]
    fn test_click_at_icon_hits_node() {
        let mut renderer = DiagramRenderer::new(chain_roadmap(), &ProgressMap::new());
        renderer.viewport_mut().pan_by(10.0, 10.0);
        let node = renderer.layout().get_node("B").unwrap().clone();
        let icon = renderer.style().icon_center(&node);
        let screen = renderer.viewport().to_screen(icon);

        assert_eq!(renderer.node_at(screen).map(|n| n.id.as_str()), Some("B"));
        assert!(renderer.click_at(screen));
        // Body of the card, away from the icon
        let body = renderer
            .viewport()
            .to_screen(Position::new(node.position.x + 10.0, node.position.y + 60.0));
        assert!(!renderer.click_at(body));
        assert_eq!(renderer.drain_events().len(), 1);
    }

    #[test]
    fn test_set_roadmap_resyncs_from_store() {
        let mut renderer = DiagramRenderer::new(chain_roadmap(), &ProgressMap::new());
        renderer.apply_status("A", NodeStatus::InProgress);

        let mut stored = ProgressMap::new();
        stored.insert("A".to_string(), NodeStatus::Done);
        renderer.set_roadmap(chain_roadmap(), &stored);
        assert_eq!(renderer.node_status("A"), Some(NodeStatus::Done));
        assert!(!renderer.layout().get_edge("A", "B").unwrap().animated);
    }

    #[test]
    fn test_apply_status_rejects_labels() {
        let mut renderer = DiagramRenderer::new(chain_roadmap(), &ProgressMap::new());
        assert!(!renderer.apply_status("phase-p1", NodeStatus::Done));
        assert!(renderer.apply_status("C", NodeStatus::Done));
        assert_eq!(renderer.node_status("C"), Some(NodeStatus::Done));
    }

    #[test]
    fn test_apply_status_updates_outgoing_edge_animation() {
        let mut renderer = DiagramRenderer::new(chain_roadmap(), &ProgressMap::new());
        assert!(renderer.layout().get_edge("A", "B").unwrap().animated);

        renderer.apply_status("A", NodeStatus::Done);
        assert!(!renderer.layout().get_edge("A", "B").unwrap().animated);
        assert!(renderer.layout().get_edge("B", "C").unwrap().animated);

        renderer.apply_status("A", NodeStatus::NotStarted);
        assert!(renderer.layout().get_edge("A", "B").unwrap().animated);
    }

    #[test]
    fn test_apply_status_leaves_sequential_edges_static() {
        let mut renderer = DiagramRenderer::new(sequential_roadmap(), &ProgressMap::new());
        renderer.apply_status("s1", NodeStatus::InProgress);
        let edge = renderer.layout().get_edge("s1", "s2").unwrap();
        assert!(!edge.animated);
        assert!(edge.dashed);
    }

    #[test]
    fn test_fit_view_respects_bounds() {
        let mut renderer = DiagramRenderer::new(chain_roadmap(), &ProgressMap::new());
        renderer.fit_view(100.0, 100.0);
        assert_eq!(renderer.viewport().zoom, 0.5);

        renderer.fit_view(10_000.0, 10_000.0);
        assert_eq!(renderer.viewport().zoom, 1.5);
    }

    #[test]
    fn test_render_skips_edges_to_hidden_nodes() {
        let mut renderer = DiagramRenderer::new(sequential_roadmap(), &ProgressMap::new());
        let arrows = |r: &DiagramRenderer| {
            r.render()
                .iter()
                .filter(|c| matches!(c, RenderCommand::Arrow { .. }))
                .count()
        };
        assert_eq!(arrows(&renderer), 2);

        renderer.set_tag_filter(Some("Core".to_string()));
        assert_eq!(arrows(&renderer), 0);
        assert_eq!(renderer.edges().len(), 2);
    }

    #[test]
    fn test_render_wraps_in_viewport_transform() {
        let renderer = DiagramRenderer::new(chain_roadmap(), &ProgressMap::new());
        let commands = renderer.render();
        assert!(matches!(commands[0], RenderCommand::Clear { .. }));
        assert_eq!(commands[1], RenderCommand::Save);
        assert_eq!(commands.last(), Some(&RenderCommand::Restore));
    }

    #[test]
    fn test_minimap_colors_follow_status() {
        let mut stored = ProgressMap::new();
        stored.insert("A".to_string(), NodeStatus::Done);
        let renderer = DiagramRenderer::new(chain_roadmap(), &stored);
        let minimap = renderer.minimap();
        let a = minimap.iter().find(|e| e.id == "A").unwrap();
        assert_eq!(a.color, theme::minimap::DONE);
    }
}
