//! Graph Stream Hub - the fan-out broker
//!
//! Single authoritative broker for one logical graph workspace. The hub owns
//! the snapshot state and the subscriber registry behind one mutex; every
//! mutation applies to the snapshot and fans out to all registered queues
//! under that lock, which makes mutations linearizable and makes `subscribe`
//! gap-free: the snapshot a subscriber replays is causally consistent with
//! its registration point, so no event is lost or delivered twice around a
//! join.
//!
//! Unknown ids on change/delete are tolerated: the hub logs and broadcasts
//! anyway. It is a relay, not a validator; referential integrity of edge
//! endpoints is the producer's responsibility.

mod subscriber;

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::types::{AttributeMap, GraphEvent, GraphSnapshot};
use subscriber::{StreamItem, Subscriber};

pub use subscriber::SubscriberHandle;

/// The hub. Cheap to share as `Arc<GraphHub>`; all methods take `&self`.
pub struct GraphHub {
    inner: Mutex<HubInner>,
}

struct HubInner {
    snapshot: GraphSnapshot,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
}

impl GraphHub {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HubInner {
                snapshot: GraphSnapshot::new(),
                subscribers: Vec::new(),
                next_subscriber_id: 0,
            }),
        }
    }

    /// Add a node, or update it if the id is already known. Never fails.
    pub fn add_node(&self, id: &str, attrs: AttributeMap, t: Option<f64>) {
        self.apply(GraphEvent::AddNode {
            id: id.to_string(),
            attrs,
            t,
        });
    }

    /// Update attributes of a known node. Unknown ids are logged and the
    /// event is broadcast anyway (tolerant mode).
    pub fn change_node(&self, id: &str, attrs: AttributeMap, t: Option<f64>) {
        self.apply(GraphEvent::ChangeNode {
            id: id.to_string(),
            attrs,
            t,
        });
    }

    /// Remove a node from the snapshot. Unknown ids are logged and the event
    /// is broadcast anyway.
    pub fn delete_node(&self, id: &str, t: Option<f64>) {
        self.apply(GraphEvent::DeleteNode {
            id: id.to_string(),
            t,
        });
    }

    /// Add an edge. Endpoints are not checked against known nodes.
    pub fn add_edge(
        &self,
        id: &str,
        source: &str,
        target: &str,
        directed: bool,
        attrs: AttributeMap,
        t: Option<f64>,
    ) {
        self.apply(GraphEvent::AddEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            directed,
            attrs,
            t,
        });
    }

    pub fn change_edge(&self, id: &str, attrs: AttributeMap, t: Option<f64>) {
        self.apply(GraphEvent::ChangeEdge {
            id: id.to_string(),
            attrs,
            t,
        });
    }

    pub fn delete_edge(&self, id: &str, t: Option<f64>) {
        self.apply(GraphEvent::DeleteEdge {
            id: id.to_string(),
            t,
        });
    }

    /// Drop the entire graph and broadcast the reset signal.
    pub fn clear(&self, t: Option<f64>) {
        self.apply(GraphEvent::Clear { t });
    }

    /// Apply one event to the snapshot and fan it out to every subscriber.
    ///
    /// This is the single mutation path: producers and the replay pipeline
    /// all come through here, so every subscriber observes the same order.
    pub fn apply(&self, event: GraphEvent) {
        let mut inner = self.inner.lock();
        self.warn_unknown(&inner.snapshot, &event);
        inner.snapshot.apply(&event);

        let event = Arc::new(event);
        // Fire-and-forget: unbounded queues never block the producer, and a
        // closed queue (consumer gone) is pruned here.
        inner
            .subscribers
            .retain(|sub| sub.tx.send(StreamItem::Event(event.clone())).is_ok());
    }

    /// Register a new subscriber.
    ///
    /// The snapshot copy and the registration happen under the same lock as
    /// broadcasts, so the returned handle replays exactly the state at its
    /// registration point and then every later event: gap-free and
    /// duplication-free.
    pub fn subscribe(self: &Arc<Self>) -> SubscriberHandle {
        let mut inner = self.inner.lock();
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;

        let replay: VecDeque<Arc<GraphEvent>> = inner
            .snapshot
            .replay_events()
            .into_iter()
            .map(Arc::new)
            .collect();

        let (tx, rx) = mpsc::unbounded_channel();
        inner.subscribers.push(Subscriber { id, tx });

        eprintln!(
            "[Hub] subscriber {} joined, replaying {} nodes and {} edges",
            id,
            inner.snapshot.node_count(),
            inner.snapshot.edge_count()
        );

        SubscriberHandle::new(id, Arc::clone(self), replay, rx)
    }

    /// Deregister a subscriber. Idempotent; also called when a handle drops.
    pub fn unsubscribe(&self, id: u64) {
        let mut inner = self.inner.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|sub| sub.id != id);
        if inner.subscribers.len() < before {
            eprintln!("[Hub] subscriber {} left", id);
        }
    }

    /// Broadcast the terminal sentinel to every subscriber and clear the
    /// registry. Streams end after draining whatever they were already sent.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        eprintln!(
            "[Hub] shutting down, releasing {} subscribers",
            inner.subscribers.len()
        );
        for sub in inner.subscribers.drain(..) {
            let _ = sub.tx.send(StreamItem::Shutdown);
        }
    }

    /// A copy of the current snapshot state.
    pub fn snapshot(&self) -> GraphSnapshot {
        self.inner.lock().snapshot.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    pub fn node_count(&self) -> usize {
        self.inner.lock().snapshot.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.lock().snapshot.edge_count()
    }

    fn warn_unknown(&self, snapshot: &GraphSnapshot, event: &GraphEvent) {
        match event {
            GraphEvent::ChangeNode { id, .. } | GraphEvent::DeleteNode { id, .. }
                if !snapshot.contains_node(id) =>
            {
                eprintln!(
                    "[Hub] {} for unknown node id '{}', broadcasting anyway",
                    event.kind(),
                    id
                );
            }
            GraphEvent::ChangeEdge { id, .. } | GraphEvent::DeleteEdge { id, .. }
                if !snapshot.contains_edge(id) =>
            {
                eprintln!(
                    "[Hub] {} for unknown edge id '{}', broadcasting anyway",
                    event.kind(),
                    id
                );
            }
            _ => {}
        }
    }
}

impl Default for GraphHub {
    fn default() -> Self {
        Self::new()
    }
}
