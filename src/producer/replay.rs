//! Event-log replay producer
//!
//! Streams a recorded JSONL event log through the hub, pacing itself by the
//! timestamp deltas between consecutive events scaled by a timewarp factor.
//! Malformed lines are logged and skipped. When the log is exhausted the hub
//! is shut down, releasing all subscribers.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::hub::GraphHub;
use crate::protocol::codec;
use crate::types::StreamResult;

#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Multiplier on the recorded inter-event gaps. 1.0 replays at recorded
    /// speed, 0.0 replays as fast as possible.
    pub timewarp: f64,
    /// Wait before the first event, giving listeners time to connect.
    pub delay: Duration,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            timewarp: 1.0,
            delay: Duration::ZERO,
        }
    }
}

/// Replay `path` through the hub, then shut the hub down.
pub async fn replay_file(
    hub: Arc<GraphHub>,
    path: &Path,
    options: ReplayOptions,
) -> StreamResult<()> {
    if !options.delay.is_zero() {
        eprintln!(
            "[Replay] waiting {}s before start streaming",
            options.delay.as_secs()
        );
        tokio::time::sleep(options.delay).await;
    }

    let content = tokio::fs::read_to_string(path).await?;
    eprintln!("[Replay] streaming events from '{}'", path.display());

    let mut before: Option<f64> = None;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match codec::decode(line) {
            Ok(event) => event,
            Err(e) => {
                eprintln!("[Replay] skipping line: {}", e);
                continue;
            }
        };

        if let Some(t) = event.timestamp() {
            if let Some(prev) = before {
                let gap = (t - prev) * options.timewarp;
                if gap > 0.0 {
                    tokio::time::sleep(Duration::from_secs_f64(gap)).await;
                }
            }
            before = Some(t);
        }

        hub.apply(event);
    }

    eprintln!("[Replay] stream finished");
    hub.shutdown();
    Ok(())
}
