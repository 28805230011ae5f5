//! Error type shared by the terminal, feed and logging layers.
//!
//! Deployment failures are not errors in this sense: they are reported
//! through [`LifecycleEvent::Error`](crate::actor::LifecycleEvent::Error).

use std::io;
use thiserror::Error;

/// Errors that can occur while following a build stream.
#[derive(Debug, Error)]
pub enum Error {
    /// Writing to the terminal or opening the log file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A feed record was not valid JSON, or its payload did not match the event.
    #[error("malformed event record: {0}")]
    Decode(#[from] serde_json::Error),

    /// A feed record named an event this crate does not know.
    #[error("unknown channel event `{0}`")]
    UnknownEvent(String),

    /// The feed reader thread could not be started.
    #[error("failed to spawn feed thread: {0}")]
    Spawn(#[source] io::Error),

    /// The global log subscriber could not be installed.
    #[error("failed to install log subscriber: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

/// Result type for buildtail operations.
pub type Result<T> = std::result::Result<T, Error>;
