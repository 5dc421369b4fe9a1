//! Request handlers for the streaming endpoint

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

use super::ServerState;
use crate::protocol::{codec, EventFilter};

/// Query parameters for a streaming connection.
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    /// Comma-separated filter terms.
    pub q: Option<String>,
}

/// GET handler: subscribe and stream events for the life of the connection.
///
/// The response starts immediately: headers, a blank CRLF line, then one
/// encoded event per CRLF-delimited line as mutations arrive. When the peer
/// disconnects the body stream is dropped, which drops the subscriber handle
/// and deregisters it from the hub.
pub async fn stream_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<StreamParams>,
) -> impl IntoResponse {
    let filter = EventFilter::from_query(params.q.as_deref());
    let mut sub = state.hub.subscribe();

    if !filter.is_match_all() {
        eprintln!(
            "[Server] subscriber {} filtering on '{}'",
            sub.id(),
            params.q.as_deref().unwrap_or("")
        );
    }

    let stream = async_stream::stream! {
        yield Ok::<_, Infallible>(Bytes::from_static(b"\r\n"));
        while let Some(event) = sub.recv().await {
            if !filter.matches(&event) {
                continue;
            }
            match codec::encode(&event) {
                Ok(mut line) => {
                    line.push_str("\r\n");
                    yield Ok(Bytes::from(line));
                }
                Err(e) => {
                    // Skip the event, keep the stream alive.
                    eprintln!("[Server] failed to encode event: {}", e);
                }
            }
        }
    };

    (
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(stream),
    )
}

/// POST handler: the protocol reserves POST but does not use it.
pub async fn update_handler() -> StatusCode {
    StatusCode::OK
}
