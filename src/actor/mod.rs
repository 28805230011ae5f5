//! Actor Model: Message passing between the event feed and the logger.
//!
//! - **Feed Actor**: Reads event records on its own thread, forwards them
//! - **Channel**: The subscription the logger reads from and releases
//! - **Logger**: Classifies events, renders output, emits lifecycle events
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ChannelEvent     ┌──────────────┐
//! │ Feed Thread  │ ─────────────────▶  │              │
//! └──────────────┘                     │ BuildLogger  │ ──▶ Console
//!                                      │              │
//!                                      └──────────────┘
//!                                             │
//!                                             │ LifecycleEvent
//!                                             ▼
//!                                      ┌──────────────┐
//!                                      │ Subscribers  │
//!                                      └──────────────┘
//! ```

mod channel;
mod feed;
mod lifecycle;
mod logger;
mod messages;

pub use channel::{Channel, ChannelHandle};
pub use feed::{decode_record, FeedActor};
pub use lifecycle::Lifecycle;
pub use logger::{BuildLogger, BuildState, LoggerConfig, Step};
pub use messages::{
    ChannelEvent, DeploymentFailure, LifecycleEvent, LogEntry, LogKind, StateSnapshot,
};
