//! Data types for the graph streaming server
//!
//! This module contains the core data structures used throughout the crate.

mod attribute;
mod event;
mod graph;

pub use attribute::{
    is_edge_property, is_node_property, AttrValue, AttributeMap, EDGE_PROPERTIES,
    EDGE_STRUCTURAL_KEYS, NODE_PROPERTIES,
};
pub use event::{EventKind, GraphEvent};
pub use graph::{EdgeState, GraphSnapshot, NodeState, Spell};

/// Result type for fallible top-level operations (startup, I/O).
pub type StreamResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
