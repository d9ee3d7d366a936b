//! Abstract rendering commands for the roadmap diagram
//!
//! This module turns positioned nodes and edges into backend-agnostic drawing
//! primitives that a Canvas, SVG, or terminal backend can replay.
//!
//! # Node Shapes
//!
//! - **Phase label**: filled rounded rectangle in the primary color, bold title
//! - **Content node**: rounded card colored by status, with title, estimate,
//!   up to two tag badges, and a status icon in the top-right corner

use super::layout::{EdgeKind, LayoutEdge, LayoutNode, Position};
use super::theme;
use crate::models::NodeStatus;
use serde::Serialize;

/// A render command that can be executed on any rendering backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Draw a filled rectangle
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
        corner_radius: f64,
    },
    /// Draw a stroked rectangle
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
        line_width: f64,
        corner_radius: f64,
    },
    /// Draw a filled circle
    FillCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: String,
    },
    /// Draw a stroked circle
    StrokeCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: String,
        line_width: f64,
    },
    /// Draw text
    Text {
        x: f64,
        y: f64,
        text: String,
        color: String,
        font_size: f64,
        font_weight: FontWeight,
        align: TextAlign,
    },
    /// Draw an arrow (line with arrowhead)
    Arrow {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: String,
        line_width: f64,
        arrow_size: f64,
        dashed: bool,
        /// Marching-ants animation
        animated: bool,
    },
    /// Save the current transform state
    Save,
    /// Restore the previous transform state
    Restore,
    /// Translate the coordinate system
    Translate { x: f64, y: f64 },
    /// Scale the coordinate system
    Scale { x: f64, y: f64 },
    /// Set global alpha (opacity)
    SetAlpha { alpha: f64 },
    /// Clear the canvas
    Clear { color: String },
}

/// Font weight for text rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Node dimensions and styling (world units)
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub width: f64,
    pub height: f64,
    pub label_height: f64,
    pub corner_radius: f64,
    pub border_width: f64,
    pub font_size: f64,
    /// Status icon radius
    pub icon_radius: f64,
    /// Tag badges shown per node
    pub max_tags: usize,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            width: 180.0,
            height: 72.0,
            label_height: 36.0,
            corner_radius: 8.0,
            border_width: 2.0,
            font_size: 14.0,
            icon_radius: 8.0,
            max_tags: 2,
        }
    }
}

impl NodeStyle {
    /// Height of the box drawn for `node`
    pub fn height_of(&self, node: &LayoutNode) -> f64 {
        if node.is_label() {
            self.label_height
        } else {
            self.height
        }
    }

    /// Whether a world-space point falls inside `node`'s box
    pub fn contains(&self, node: &LayoutNode, point: Position) -> bool {
        let p = node.position;
        point.x >= p.x
            && point.x <= p.x + self.width
            && point.y >= p.y
            && point.y <= p.y + self.height_of(node)
    }

    /// Center of the status icon of a content node
    pub fn icon_center(&self, node: &LayoutNode) -> Position {
        Position::new(
            node.position.x + self.width - 12.0 - self.icon_radius,
            node.position.y + 12.0 + self.icon_radius,
        )
    }
}

/// Edge styling
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub line_width: f64,
    pub arrow_size: f64,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            arrow_size: 10.0,
        }
    }
}

/// Get edge style based on edge kind
pub fn edge_style_for_kind(kind: EdgeKind) -> EdgeStyle {
    match kind {
        EdgeKind::Dependency => EdgeStyle::default(),
        EdgeKind::Sequential => EdgeStyle {
            line_width: 1.5,
            arrow_size: 8.0,
        },
    }
}

/// Generate render commands for a node
pub fn render_node(node: &LayoutNode, style: &NodeStyle) -> Vec<RenderCommand> {
    if node.is_label() {
        return render_label(node, style);
    }

    let mut commands = Vec::new();
    let status = node.status.unwrap_or_default();
    let x = node.position.x;
    let y = node.position.y;

    if status == NodeStatus::Confident {
        commands.push(RenderCommand::SetAlpha {
            alpha: theme::status::CONFIDENT_ALPHA,
        });
    }

    commands.push(RenderCommand::FillRect {
        x,
        y,
        width: style.width,
        height: style.height,
        color: theme::status_fill(status).to_string(),
        corner_radius: style.corner_radius,
    });
    commands.push(RenderCommand::StrokeRect {
        x,
        y,
        width: style.width,
        height: style.height,
        color: theme::status_border(status).to_string(),
        line_width: style.border_width,
        corner_radius: style.corner_radius,
    });

    // Title, leaving room for the status icon
    let max_chars = ((style.width - 48.0) / (style.font_size * 0.55)).max(4.0) as usize;
    commands.push(RenderCommand::Text {
        x: x + 12.0,
        y: y + 12.0 + style.font_size,
        text: truncate_text(&node.title, max_chars),
        color: theme::text::PRIMARY.to_string(),
        font_size: style.font_size,
        font_weight: FontWeight::Bold,
        align: TextAlign::Left,
    });

    if let Some(hours) = node.estimated_hours {
        commands.push(RenderCommand::Text {
            x: x + 12.0,
            y: y + 16.0 + style.font_size * 2.0,
            text: format!("~{}h", hours),
            color: theme::text::MUTED.to_string(),
            font_size: style.font_size * 0.8,
            font_weight: FontWeight::Normal,
            align: TextAlign::Left,
        });
    }

    commands.extend(render_tags(node, style));
    commands.extend(render_status_icon(node, status, style));

    if status == NodeStatus::Confident {
        commands.push(RenderCommand::SetAlpha { alpha: 1.0 });
    }

    commands
}

fn render_label(node: &LayoutNode, style: &NodeStyle) -> Vec<RenderCommand> {
    vec![
        RenderCommand::FillRect {
            x: node.position.x,
            y: node.position.y,
            width: style.width,
            height: style.label_height,
            color: theme::label::BACKGROUND.to_string(),
            corner_radius: style.corner_radius,
        },
        RenderCommand::Text {
            x: node.position.x + style.width / 2.0,
            y: node.position.y + style.label_height / 2.0 + style.font_size * 0.35,
            text: node.title.clone(),
            color: theme::text::ON_PRIMARY.to_string(),
            font_size: style.font_size,
            font_weight: FontWeight::Bold,
            align: TextAlign::Center,
        },
    ]
}

fn render_tags(node: &LayoutNode, style: &NodeStyle) -> Vec<RenderCommand> {
    let badge_font = style.font_size * 0.75;
    let badge_height = badge_font + 6.0;
    let badge_y = node.position.y + style.height - badge_height - 8.0;
    let mut badge_x = node.position.x + 12.0;
    let mut commands = Vec::new();

    for tag in node.tags.iter().take(style.max_tags) {
        let width = tag.chars().count() as f64 * badge_font * 0.6 + 12.0;
        commands.push(RenderCommand::FillRect {
            x: badge_x,
            y: badge_y,
            width,
            height: badge_height,
            color: theme::background::BADGE.to_string(),
            corner_radius: badge_height / 2.0,
        });
        commands.push(RenderCommand::Text {
            x: badge_x + 6.0,
            y: badge_y + badge_font + 1.0,
            text: tag.clone(),
            color: theme::text::PRIMARY.to_string(),
            font_size: badge_font,
            font_weight: FontWeight::Normal,
            align: TextAlign::Left,
        });
        badge_x += width + 4.0;
    }

    commands
}

/// Check mark for done/confident, filled dot for in progress, hollow ring otherwise
fn render_status_icon(node: &LayoutNode, status: NodeStatus, style: &NodeStyle) -> Vec<RenderCommand> {
    let center = style.icon_center(node);
    let color = theme::status_icon(status).to_string();
    match status {
        NodeStatus::Done | NodeStatus::Confident => vec![
            RenderCommand::FillCircle {
                cx: center.x,
                cy: center.y,
                radius: style.icon_radius,
                color,
            },
            RenderCommand::Text {
                x: center.x,
                y: center.y + style.icon_radius * 0.5,
                text: "✓".to_string(),
                color: theme::text::ON_PRIMARY.to_string(),
                font_size: style.icon_radius * 1.5,
                font_weight: FontWeight::Bold,
                align: TextAlign::Center,
            },
        ],
        NodeStatus::InProgress => vec![
            RenderCommand::StrokeCircle {
                cx: center.x,
                cy: center.y,
                radius: style.icon_radius,
                color: color.clone(),
                line_width: 2.0,
            },
            RenderCommand::FillCircle {
                cx: center.x,
                cy: center.y,
                radius: style.icon_radius * 0.4,
                color,
            },
        ],
        NodeStatus::NotStarted => vec![RenderCommand::StrokeCircle {
            cx: center.x,
            cy: center.y,
            radius: style.icon_radius,
            color,
            line_width: 2.0,
        }],
    }
}

/// Generate render commands for an edge
///
/// Edges leave the right side of the source and enter the left side of the target.
pub fn render_edge(
    edge: &LayoutEdge,
    source: &LayoutNode,
    target: &LayoutNode,
    node_style: &NodeStyle,
) -> Vec<RenderCommand> {
    let style = edge_style_for_kind(edge.kind);
    vec![RenderCommand::Arrow {
        x1: source.position.x + node_style.width,
        y1: source.position.y + node_style.height_of(source) / 2.0,
        x2: target.position.x,
        y2: target.position.y + node_style.height_of(target) / 2.0,
        color: theme::edge_color(edge.kind).to_string(),
        line_width: style.line_width,
        arrow_size: style.arrow_size,
        dashed: edge.dashed,
        animated: edge.animated,
    }]
}

/// Truncate text to a maximum length with ellipsis
fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
