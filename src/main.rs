//! Graph Stream Server - Binary Entry Point
//!
//! Starts the hub, the configured producer, and the HTTP streaming endpoint.
//! Ctrl+C broadcasts the terminal sentinel to all subscribers before exit.

use std::sync::Arc;

use graph_stream::config::{ProducerMode, ServerConfig};
use graph_stream::hub::GraphHub;
use graph_stream::producer::{replay_file, RandomChurn, ReplayOptions};
use graph_stream::server::{create_router, ServerState};
use graph_stream::types::StreamResult;

#[tokio::main]
async fn main() -> StreamResult<()> {
    let config = ServerConfig::from_env();
    let hub = Arc::new(GraphHub::new());

    match config.mode {
        ProducerMode::Random => {
            let churn = RandomChurn::new(hub.clone(), config.nr_nodes);
            tokio::spawn(churn.run());
        }
        ProducerMode::Replay => {
            let path = config
                .replay_file
                .clone()
                .ok_or("STREAM_REPLAY_FILE is required in replay mode")?;
            let options = ReplayOptions {
                timewarp: config.timewarp,
                delay: config.delay,
            };
            let replay_hub = hub.clone();
            tokio::spawn(async move {
                if let Err(e) = replay_file(replay_hub, &path, options).await {
                    eprintln!("[Replay] {}", e);
                }
            });
        }
        ProducerMode::None => {}
    }

    let state = Arc::new(ServerState::new(hub.clone()));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    eprintln!("[Server] listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(hub))
        .await?;

    Ok(())
}

async fn shutdown_signal(hub: Arc<GraphHub>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("[Server] failed to listen for shutdown signal: {}", e);
        return;
    }
    eprintln!("[Server] stopping");
    hub.shutdown();
}
