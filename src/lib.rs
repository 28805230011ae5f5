//! # Buildtail
//!
//! Follow a deployment's build log stream in the terminal.
//!
//! Buildtail reads the events a deployment service publishes for one host
//! and renders them: a banner when the build starts, command echoes,
//! stderr lines, and a small window of the latest stdout lines that redraws
//! in place instead of scrolling the terminal away.
//!
//! ## Core Concepts
//!
//! - **Channel**: Injected subscription delivering [`ChannelEvent`]s
//! - **Scroll window**: The last N stdout lines, erased and reprinted on overflow
//! - **Lifecycle**: `error` and `close` notifications for subscribers
//! - **Single flush**: Output for one event is written in one syscall
//!
//! ## Example
//!
//! ```rust,no_run
//! use buildtail::{BuildLogger, ChannelEvent, ChannelHandle, LogEntry, LoggerConfig};
//!
//! let (tx, channel) = ChannelHandle::bounded(16);
//! tx.send(ChannelEvent::Logs(LogEntry::command("npm install"))).unwrap();
//! tx.send(ChannelEvent::Backend).unwrap();
//!
//! let mut logger = BuildLogger::new("my-app.now.sh", channel, LoggerConfig::default());
//! logger.on_close(|| eprintln!("done"));
//! logger.run()?;
//! # Ok::<(), buildtail::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod error;
pub mod logging;
pub mod terminal;
pub mod widget;

// Re-exports for convenience
pub use actor::{
    BuildLogger, BuildState, Channel, ChannelEvent, ChannelHandle, DeploymentFailure,
    LifecycleEvent, LogEntry, LogKind, LoggerConfig, StateSnapshot,
};
pub use error::{Error, Result};
pub use terminal::{Console, Palette};
pub use widget::ScrollBuffer;
