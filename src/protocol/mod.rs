//! The graph streaming wire protocol
//!
//! Line-delimited JSON mutation events (`codec`), the error taxonomy for
//! decoding them (`error`), and the per-connection term filter (`filter`).

pub mod codec;
mod error;
mod filter;

pub use codec::{decode, encode};
pub use error::{ProtocolError, ProtocolResult};
pub use filter::EventFilter;
