//! HTTP server setup with Axum
//!
//! One long-lived GET connection per subscriber. Each connection registers
//! with the hub, streams the catch-up replay and then live events until the
//! peer disconnects or the hub shuts down.

mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::hub::GraphHub;

pub use handlers::StreamParams;

/// Shared state for the streaming endpoints.
pub struct ServerState {
    pub hub: Arc<GraphHub>,
}

impl ServerState {
    pub fn new(hub: Arc<GraphHub>) -> Self {
        Self { hub }
    }
}

/// Create the Axum router with all endpoints.
pub fn create_router(state: Arc<ServerState>) -> Router {
    // CORS configuration - allow all origins so browser-based viewers can
    // connect alongside desktop clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Streaming endpoint; clients may address a workspace path segment,
        // but a single hub serves one logical workspace
        .route(
            "/",
            get(handlers::stream_handler).post(handlers::update_handler),
        )
        .route(
            "/:workspace",
            get(handlers::stream_handler).post(handlers::update_handler),
        )
        // Health check
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let hub = Arc::new(GraphHub::new());
        let state = Arc::new(ServerState::new(hub));
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_post_is_accepted_and_ignored() {
        let hub = Arc::new(GraphHub::new());
        let state = Arc::new(ServerState::new(hub.clone()));
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/workspace0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(hub.node_count(), 0);
    }
}
