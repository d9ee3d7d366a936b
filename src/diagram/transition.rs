//! Status transition engine.
//!
//! Each content node cycles through three states when toggled:
//!
//! ```text
//! not_started -> in_progress -> done -> not_started
//! ```
//!
//! `confident` only comes from authored data. It is not part of the cycle and
//! is treated like `not_started`, so toggling a confident node moves it to
//! `in_progress`.
//!
//! A transition updates the diagram's cached status (and the animation of
//! the dependency edges leaving the node), writes the node's new
//! status through to the progress store, then notifies the registered
//! listener. Persistence is best effort: a failed write is logged and the
//! in-memory state is kept.

use super::renderer::{DiagramEvent, DiagramRenderer};
use crate::models::NodeStatus;
use crate::storage::ProgressStore;
use serde::Serialize;

/// Status that follows `current` when a node is toggled
pub fn next_status(current: NodeStatus) -> NodeStatus {
    match current {
        NodeStatus::NotStarted => NodeStatus::InProgress,
        NodeStatus::InProgress => NodeStatus::Done,
        NodeStatus::Done => NodeStatus::NotStarted,
        NodeStatus::Confident => NodeStatus::InProgress,
    }
}

/// Callback invoked once per applied toggle with the node id and its new status
pub type StatusListener = Box<dyn FnMut(&str, NodeStatus)>;

/// A transition that was applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub node_id: String,
    pub previous: NodeStatus,
    pub status: NodeStatus,
    /// Whether the new status reached the progress store
    pub persisted: bool,
}

/// Applies `NodeToggled` events to the diagram and the progress store
pub struct StatusTransitionEngine<S: ProgressStore> {
    store: S,
    listener: Option<StatusListener>,
}

impl<S: ProgressStore> StatusTransitionEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            listener: None,
        }
    }

    /// Register the status-change listener, replacing any previous one
    pub fn set_listener(&mut self, listener: impl FnMut(&str, NodeStatus) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply one event. Events for label or unknown nodes are ignored.
    pub fn handle(
        &mut self,
        event: &DiagramEvent,
        renderer: &mut DiagramRenderer,
    ) -> Option<StatusChange> {
        let DiagramEvent::NodeToggled { node_id } = event;

        let Some(previous) = renderer.node_status(node_id) else {
            tracing::debug!(node = %node_id, "ignoring toggle for non-interactive node");
            return None;
        };
        let status = next_status(previous);

        renderer.apply_status(node_id, status);

        let persisted = match self.store.set_status(node_id, status) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(node = %node_id, "failed to persist status: {}", e);
                false
            }
        };

        if let Some(listener) = self.listener.as_mut() {
            listener(node_id, status);
        }

        tracing::debug!(node = %node_id, from = %previous, to = %status, "status toggled");
        Some(StatusChange {
            node_id: node_id.clone(),
            previous,
            status,
            persisted,
        })
    }

    /// Drain and apply every event queued on the renderer
    pub fn process(&mut self, renderer: &mut DiagramRenderer) -> Vec<StatusChange> {
        renderer
            .drain_events()
            .iter()
            .filter_map(|event| self.handle(event, renderer))
            .collect()
    }
}
