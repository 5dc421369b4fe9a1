//! Graph snapshot state
//!
//! The last-known state of the streamed graph: which node and edge ids exist
//! and the attributes they were last given. The hub keeps one snapshot for
//! catch-up replay; subscribers can rebuild an identical one by applying the
//! events they receive, in order, to an empty snapshot.
//!
//! When events carry timestamps the snapshot also records presence intervals
//! ("spells") for the entities it currently holds: a timestamped add opens an
//! interval, a timestamped re-add closes the open one and opens a new one.
//! Deleted entities leave the map entirely, history included; interval
//! archives belong to time-aware consumers, not to the relay.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::AttributeMap;
use super::event::GraphEvent;

/// A (start, end) presence interval. `end: None` means currently present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

impl Spell {
    fn open(start: Option<f64>) -> Self {
        Self { start, end: None }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// Last-known state of one node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeState {
    pub attrs: AttributeMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spells: Vec<Spell>,
}

/// Last-known state of one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeState {
    pub source: String,
    pub target: String,
    pub directed: bool,
    pub attrs: AttributeMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spells: Vec<Spell>,
}

/// The snapshot: node id and edge id maps.
///
/// An id present in a map was added and not yet deleted. Change/delete of an
/// unknown id is ignored here; the hub logs it before applying. Deleting a
/// node does not cascade to its edges: the hub is a relay, and endpoint
/// consistency is the producer's responsibility.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: BTreeMap<String, NodeState>,
    pub edges: BTreeMap<String, EdgeState>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&NodeState> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeState> {
        self.edges.get(id)
    }

    /// Apply one event to this snapshot. Unknown-id changes and deletes are
    /// silent no-ops; tolerance reporting lives in the hub.
    pub fn apply(&mut self, event: &GraphEvent) {
        match event {
            GraphEvent::AddNode { id, attrs, t } => {
                let node = self.nodes.entry(id.clone()).or_default();
                node.attrs.extend(attrs.clone());
                if t.is_some() {
                    close_open_spell(&mut node.spells, *t);
                    node.spells.push(Spell::open(*t));
                }
            }
            GraphEvent::ChangeNode { id, attrs, .. } => {
                if let Some(node) = self.nodes.get_mut(id) {
                    node.attrs.extend(attrs.clone());
                }
            }
            GraphEvent::DeleteNode { id, .. } => {
                self.nodes.remove(id);
            }
            GraphEvent::AddEdge {
                id,
                source,
                target,
                directed,
                attrs,
                t,
            } => {
                let edge = self.edges.entry(id.clone()).or_insert_with(|| EdgeState {
                    source: source.clone(),
                    target: target.clone(),
                    directed: *directed,
                    attrs: AttributeMap::new(),
                    spells: Vec::new(),
                });
                edge.attrs.extend(attrs.clone());
                if t.is_some() {
                    close_open_spell(&mut edge.spells, *t);
                    edge.spells.push(Spell::open(*t));
                }
            }
            GraphEvent::ChangeEdge { id, attrs, .. } => {
                if let Some(edge) = self.edges.get_mut(id) {
                    edge.attrs.extend(attrs.clone());
                }
            }
            GraphEvent::DeleteEdge { id, .. } => {
                self.edges.remove(id);
            }
            GraphEvent::Clear { .. } => {
                self.nodes.clear();
                self.edges.clear();
            }
        }
    }

    /// The catch-up sequence reconstructing this snapshot on an empty graph:
    /// one AddNode per known node, then one AddEdge per known edge. Replay
    /// events are synthetic, so they carry no timestamp.
    pub fn replay_events(&self) -> Vec<GraphEvent> {
        let mut events = Vec::with_capacity(self.nodes.len() + self.edges.len());
        for (id, node) in &self.nodes {
            events.push(GraphEvent::AddNode {
                id: id.clone(),
                attrs: node.attrs.clone(),
                t: None,
            });
        }
        for (id, edge) in &self.edges {
            events.push(GraphEvent::AddEdge {
                id: id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                directed: edge.directed,
                attrs: edge.attrs.clone(),
                t: None,
            });
        }
        events
    }
}

fn close_open_spell(spells: &mut [Spell], end: Option<f64>) {
    if let Some(last) = spells.last_mut() {
        if last.is_open() {
            last.end = end;
        }
    }
}
