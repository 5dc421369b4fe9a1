//! Integration tests for the HTTP streaming endpoint

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use futures::StreamExt;
use tower::util::ServiceExt;

use graph_stream::hub::GraphHub;
use graph_stream::protocol::codec;
use graph_stream::server::{create_router, ServerState};
use graph_stream::types::{AttrValue, AttributeMap, EventKind, GraphEvent};

fn label(text: &str) -> AttributeMap {
    let mut attrs = AttributeMap::new();
    attrs.insert("label".to_string(), AttrValue::Text(text.to_string()));
    attrs
}

/// Read body frames until the stream ends or stays quiet for `quiet`.
async fn read_stream(body: Body, quiet: Duration) -> String {
    let mut stream = body.into_data_stream();
    let mut collected = String::new();
    while let Ok(Some(Ok(bytes))) = tokio::time::timeout(quiet, stream.next()).await {
        collected.push_str(std::str::from_utf8(&bytes).unwrap());
    }
    collected
}

fn decode_lines(text: &str) -> Vec<GraphEvent> {
    text.split("\r\n")
        .filter(|line| !line.is_empty())
        .map(|line| codec::decode(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_stream_opens_with_blank_line_and_replay() {
    let hub = Arc::new(GraphHub::new());
    hub.add_node("A", label("A"), None);
    hub.add_node("B", label("B"), None);
    hub.add_edge("e1", "A", "B", true, AttributeMap::new(), None);

    let state = Arc::new(ServerState::new(hub.clone()));
    let app = create_router(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let body = read_stream(response.into_body(), Duration::from_millis(100)).await;
    assert!(body.starts_with("\r\n"), "body must begin with a blank line");

    let events = decode_lines(&body);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].id(), Some("A"));
    assert_eq!(events[1].id(), Some("B"));
    assert_eq!(events[2].kind(), EventKind::AddEdge);
}

#[tokio::test]
async fn test_live_events_follow_replay() {
    let hub = Arc::new(GraphHub::new());
    hub.add_node("A", label("A"), None);

    let state = Arc::new(ServerState::new(hub.clone()));
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/workspace0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // The subscriber is registered once the response headers are out; these
    // are live events.
    hub.delete_node("A", None);
    hub.shutdown();

    let body = read_stream(response.into_body(), Duration::from_millis(200)).await;
    let events = decode_lines(&body);

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind(), EventKind::AddNode);
    assert_eq!(events[1].kind(), EventKind::DeleteNode);
}

#[tokio::test]
async fn test_query_filter_suppresses_non_matching_events() {
    let hub = Arc::new(GraphHub::new());
    hub.add_node("alice", label("alice"), None);
    hub.add_node("bob", label("bob"), None);

    let state = Arc::new(ServerState::new(hub.clone()));
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?q=alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    hub.shutdown();

    let body = read_stream(response.into_body(), Duration::from_millis(200)).await;
    let events = decode_lines(&body);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id(), Some("alice"));
}

#[tokio::test]
async fn test_stream_ends_after_hub_shutdown() {
    let hub = Arc::new(GraphHub::new());
    let state = Arc::new(ServerState::new(hub.clone()));
    let app = create_router(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(hub.subscriber_count(), 1);
    hub.shutdown();

    let mut stream = response.into_body().into_data_stream();
    // Blank preamble, then end of stream.
    let first = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("preamble frame");
    assert!(first.is_some());
    let end = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("stream should end after shutdown");
    assert!(end.is_none());

    assert_eq!(hub.subscriber_count(), 0);
}

#[tokio::test]
async fn test_disconnect_unsubscribes() {
    let hub = Arc::new(GraphHub::new());
    let state = Arc::new(ServerState::new(hub.clone()));
    let app = create_router(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(hub.subscriber_count(), 1);

    // Peer goes away: dropping the response drops the body stream and with
    // it the subscriber handle.
    drop(response);
    assert_eq!(hub.subscriber_count(), 0);
}
