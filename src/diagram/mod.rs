//! Roadmap diagram.
//!
//! - `layout`: positions phases and nodes on a grid and derives edges
//! - `render`: draw commands and node/edge styles
//! - `theme`: colors and legend
//! - `renderer`: viewport, tag filter, hit testing, and click events
//! - `transition`: the status cycle driven by node clicks

pub mod layout;
pub mod render;
pub mod renderer;
pub mod theme;
pub mod transition;

pub use layout::{
    Bounds, EdgeKind, Layout, LayoutConfig, LayoutEdge, LayoutNode, NodeKind, Position,
    generate_layout, generate_layout_with_config,
};
pub use render::{NodeStyle, RenderCommand};
pub use renderer::{DiagramEvent, DiagramRenderer, MinimapEntry, Viewport};
pub use theme::{LegendEntry, legend};
pub use transition::{StatusChange, StatusListener, StatusTransitionEngine, next_status};
