//! Graph mutation events
//!
//! Events are immutable records of graph changes. A producer emits them, the
//! hub applies them to its snapshot and fans them out, and subscribers replay
//! them to reconstruct state.

use serde::{Deserialize, Serialize};

use super::attribute::AttributeMap;

/// The six mutation kinds of the wire format, plus the clear control event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AddNode,
    ChangeNode,
    DeleteNode,
    AddEdge,
    ChangeEdge,
    DeleteEdge,
    Clear,
}

impl EventKind {
    /// The two-letter wire key for this kind. `Clear` travels as a special
    /// `dn` payload, so it shares that key.
    pub fn wire_key(&self) -> &'static str {
        match self {
            EventKind::AddNode => "an",
            EventKind::ChangeNode => "cn",
            EventKind::DeleteNode | EventKind::Clear => "dn",
            EventKind::AddEdge => "ae",
            EventKind::ChangeEdge => "ce",
            EventKind::DeleteEdge => "de",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::AddNode => write!(f, "add_node"),
            EventKind::ChangeNode => write!(f, "change_node"),
            EventKind::DeleteNode => write!(f, "delete_node"),
            EventKind::AddEdge => write!(f, "add_edge"),
            EventKind::ChangeEdge => write!(f, "change_edge"),
            EventKind::DeleteEdge => write!(f, "delete_edge"),
            EventKind::Clear => write!(f, "clear"),
        }
    }
}

/// One graph mutation.
///
/// Every variant carries an optional timestamp (`t` on the wire), used by
/// time-aware consumers for presence-interval tracking. Ids are opaque
/// strings; an edge id is independent of its endpoint pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphEvent {
    AddNode {
        id: String,
        attrs: AttributeMap,
        t: Option<f64>,
    },
    ChangeNode {
        id: String,
        attrs: AttributeMap,
        t: Option<f64>,
    },
    DeleteNode {
        id: String,
        t: Option<f64>,
    },
    AddEdge {
        id: String,
        source: String,
        target: String,
        directed: bool,
        attrs: AttributeMap,
        t: Option<f64>,
    },
    ChangeEdge {
        id: String,
        attrs: AttributeMap,
        t: Option<f64>,
    },
    DeleteEdge {
        id: String,
        t: Option<f64>,
    },
    /// Reset signal: drop the entire graph. Travels as `{"dn":{"filter":"ALL"}}`.
    Clear { t: Option<f64> },
}

impl GraphEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GraphEvent::AddNode { .. } => EventKind::AddNode,
            GraphEvent::ChangeNode { .. } => EventKind::ChangeNode,
            GraphEvent::DeleteNode { .. } => EventKind::DeleteNode,
            GraphEvent::AddEdge { .. } => EventKind::AddEdge,
            GraphEvent::ChangeEdge { .. } => EventKind::ChangeEdge,
            GraphEvent::DeleteEdge { .. } => EventKind::DeleteEdge,
            GraphEvent::Clear { .. } => EventKind::Clear,
        }
    }

    /// The target id, if the event addresses a single node or edge.
    pub fn id(&self) -> Option<&str> {
        match self {
            GraphEvent::AddNode { id, .. }
            | GraphEvent::ChangeNode { id, .. }
            | GraphEvent::DeleteNode { id, .. }
            | GraphEvent::AddEdge { id, .. }
            | GraphEvent::ChangeEdge { id, .. }
            | GraphEvent::DeleteEdge { id, .. } => Some(id),
            GraphEvent::Clear { .. } => None,
        }
    }

    pub fn timestamp(&self) -> Option<f64> {
        match self {
            GraphEvent::AddNode { t, .. }
            | GraphEvent::ChangeNode { t, .. }
            | GraphEvent::DeleteNode { t, .. }
            | GraphEvent::AddEdge { t, .. }
            | GraphEvent::ChangeEdge { t, .. }
            | GraphEvent::DeleteEdge { t, .. }
            | GraphEvent::Clear { t } => *t,
        }
    }

    /// The attribute map, for the variants that carry one.
    pub fn attrs(&self) -> Option<&AttributeMap> {
        match self {
            GraphEvent::AddNode { attrs, .. }
            | GraphEvent::ChangeNode { attrs, .. }
            | GraphEvent::AddEdge { attrs, .. }
            | GraphEvent::ChangeEdge { attrs, .. } => Some(attrs),
            _ => None,
        }
    }
}
