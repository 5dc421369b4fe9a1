//! Graph streaming server
//!
//! An event-sourced graph delta protocol and its multi-subscriber fan-out
//! server. One producer of graph mutation events (add/change/delete node or
//! edge) serves many concurrent long-lived HTTP listeners; each listener sees
//! the stream from its own connection time forward, preceded by a catch-up
//! replay of the current graph state.
//!
//! # Modules
//!
//! - `types`: core data structures (attribute values, events, snapshot state)
//! - `protocol`: the line-delimited JSON wire codec and the term filter
//! - `hub`: the broker owning snapshot state and the subscriber registry
//! - `server`: the axum streaming endpoint
//! - `client`: buffered event writer producing replayable logs
//! - `producer`: random churn and event-log replay producers
//! - `config`: environment-driven server configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use graph_stream::hub::GraphHub;
//! use graph_stream::types::AttributeMap;
//!
//! #[tokio::main]
//! async fn main() {
//!     let hub = Arc::new(GraphHub::new());
//!     let mut sub = hub.subscribe();
//!
//!     hub.add_node("A", AttributeMap::new(), None);
//!     let event = sub.recv().await.unwrap();
//!     assert_eq!(event.id(), Some("A"));
//! }
//! ```

pub mod client;
pub mod config;
pub mod hub;
pub mod producer;
pub mod protocol;
pub mod server;
pub mod types;

// Re-export commonly used items at crate root
pub use client::StreamWriter;
pub use hub::{GraphHub, SubscriberHandle};
pub use protocol::{decode, encode, EventFilter, ProtocolError, ProtocolResult};
pub use types::{
    AttrValue, AttributeMap, EventKind, GraphEvent, GraphSnapshot, StreamResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
