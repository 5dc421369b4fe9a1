//! Server configuration
//!
//! Resolved once at startup from environment variables, falling back to the
//! defaults the protocol's reference scripts used (port 8181, 50 nodes).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Which producer drives the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerMode {
    /// Random edge churn generator.
    Random,
    /// Replay a recorded event log.
    Replay,
    /// No producer; an embedding application feeds the hub itself.
    None,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port to listen on (`STREAM_PORT`).
    pub port: u16,
    /// Producer selection (`STREAM_MODE`: random | replay | none).
    pub mode: ProducerMode,
    /// Node count for the random producer (`STREAM_NODES`).
    pub nr_nodes: usize,
    /// Event log for the replay producer (`STREAM_REPLAY_FILE`).
    pub replay_file: Option<PathBuf>,
    /// Time warping factor for replay (`STREAM_TIMEWARP`).
    pub timewarp: f64,
    /// Replay start delay in seconds (`STREAM_DELAY`).
    pub delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8181,
            mode: ProducerMode::Random,
            nr_nodes: 50,
            replay_file: None,
            timewarp: 1.0,
            delay: Duration::ZERO,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the environment, keeping defaults for unset
    /// or unparseable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_var("STREAM_PORT").unwrap_or(defaults.port),
            mode: env::var("STREAM_MODE")
                .ok()
                .and_then(|s| parse_mode(&s))
                .unwrap_or(defaults.mode),
            nr_nodes: parse_var("STREAM_NODES").unwrap_or(defaults.nr_nodes),
            replay_file: env::var("STREAM_REPLAY_FILE").ok().map(PathBuf::from),
            timewarp: parse_var("STREAM_TIMEWARP").unwrap_or(defaults.timewarp),
            delay: parse_var("STREAM_DELAY")
                .map(Duration::from_secs)
                .unwrap_or(defaults.delay),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

fn parse_mode(s: &str) -> Option<ProducerMode> {
    match s.to_lowercase().as_str() {
        "random" => Some(ProducerMode::Random),
        "replay" => Some(ProducerMode::Replay),
        "none" => Some(ProducerMode::None),
        other => {
            eprintln!("[Config] unknown STREAM_MODE '{}', using default", other);
            None
        }
    }
}
