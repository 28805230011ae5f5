//! Logger: Coordinator that follows one deployment's event stream.
//!
//! The logger owns the channel subscription and a [`ScrollBuffer`]. Each
//! inbound event is classified into a lifecycle transition or a log entry
//! and handled to completion before the next one is read.

use super::channel::Channel;
use super::lifecycle::Lifecycle;
use super::messages::{ChannelEvent, DeploymentFailure, LifecycleEvent, LogEntry, LogKind, StateSnapshot};
use crate::error::Result;
use crate::terminal::{fit_width, Console, Palette};
use crate::widget::ScrollBuffer;
use crossbeam_channel::Receiver;
use std::io::{Stderr, Stdout, Write};

/// Columns taken by the `> ` marker in front of each stdout line.
const PREFIX_COLUMNS: usize = 2;

/// Configuration for the logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Print advisory transport errors.
    pub debug: bool,
    /// Suppress the banner and all per-entry output.
    pub quiet: bool,
    /// Number of stdout lines kept on screen.
    pub capacity: usize,
    /// Whether to color markers and error lines.
    pub color: bool,
    /// Terminal width; stdout lines are truncated to fit when set.
    pub max_width: Option<usize>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            quiet: false,
            capacity: 10,
            color: true,
            max_width: None,
        }
    }
}

impl LoggerConfig {
    /// Set the debug flag.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the quiet flag.
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the scroll window capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enable or disable color.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Set the terminal width used to truncate stdout lines.
    #[must_use]
    pub const fn with_max_width(mut self, max_width: Option<usize>) -> Self {
        self.max_width = max_width;
        self
    }
}

/// Where the build is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildState {
    /// No log entry seen yet.
    #[default]
    Idle,
    /// Log entries are arriving.
    Building,
    /// The build finished and the channel was released.
    Completed,
    /// The deployment was not found or reported an error.
    Errored(DeploymentFailure),
}

impl BuildState {
    /// Check if no further events will be processed.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Errored(_))
    }
}

/// Whether the stream should keep being read after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep reading.
    Continue,
    /// The run reached a terminal state.
    Stop,
}

/// Follows a deployment's build stream and renders it to a console.
pub struct BuildLogger<C, O = Stdout, E = Stderr> {
    /// Deployment identifier.
    host: String,
    /// Configuration.
    config: LoggerConfig,
    /// Lifecycle state.
    state: BuildState,
    /// Whether an advisory transport error was already seen.
    transport_error_seen: bool,
    /// The subscription.
    channel: C,
    /// Window of recent stdout lines.
    lines: ScrollBuffer,
    /// Output streams.
    console: Console<O, E>,
    /// Subscribers to `error` and `close`.
    lifecycle: Lifecycle,
}

impl<C: Channel> BuildLogger<C> {
    /// Create a logger writing to stdout and stderr.
    pub fn new(host: impl Into<String>, channel: C, config: LoggerConfig) -> Self {
        let console = Console::stdio(Palette { color: config.color });
        Self::with_console(host, channel, config, console)
    }
}

impl<C: Channel, O: Write, E: Write> BuildLogger<C, O, E> {
    /// Create a logger writing to the given console.
    ///
    /// The console's palette wins over `config.color`.
    pub fn with_console(
        host: impl Into<String>,
        channel: C,
        config: LoggerConfig,
        console: Console<O, E>,
    ) -> Self {
        Self {
            host: host.into(),
            lines: ScrollBuffer::new(config.capacity),
            config,
            state: BuildState::Idle,
            transport_error_seen: false,
            channel,
            console,
            lifecycle: Lifecycle::new(),
        }
    }

    /// The deployment identifier.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The configuration.
    pub const fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// The current lifecycle state.
    pub const fn state(&self) -> BuildState {
        self.state
    }

    /// Check whether log entries are arriving.
    pub const fn is_building(&self) -> bool {
        matches!(self.state, BuildState::Building)
    }

    /// The scroll window.
    pub const fn lines(&self) -> &ScrollBuffer {
        &self.lines
    }

    /// The console.
    pub const fn console(&self) -> &Console<O, E> {
        &self.console
    }

    /// The channel.
    pub const fn channel(&self) -> &C {
        &self.channel
    }

    /// Register a handler for `error` events.
    pub fn on_error(&mut self, handler: impl FnMut(DeploymentFailure) + 'static) {
        self.lifecycle.on_error(handler);
    }

    /// Register a handler for `close` events.
    pub fn on_close(&mut self, handler: impl FnMut() + 'static) {
        self.lifecycle.on_close(handler);
    }

    /// Subscribe to lifecycle events through a channel.
    pub fn subscribe(&mut self) -> Receiver<LifecycleEvent> {
        self.lifecycle.subscribe()
    }

    /// Read events until the run terminates or the channel ends.
    ///
    /// Returns the final state; `Idle` or `Building` means the stream ended
    /// before the deployment reached a verdict.
    pub fn run(&mut self) -> Result<BuildState> {
        let span = tracing::debug_span!("build_stream", host = %self.host);
        let _enter = span.enter();

        while let Some(event) = self.channel.recv() {
            if self.handle_event(event)? == Step::Stop {
                break;
            }
        }

        tracing::debug!(state = ?self.state, "build stream finished");
        Ok(self.state)
    }

    /// Handle one inbound event, flushing the console afterwards.
    pub fn handle_event(&mut self, event: ChannelEvent) -> Result<Step> {
        if self.state.is_terminal() {
            tracing::debug!(?event, "ignoring event after terminal state");
            return Ok(Step::Stop);
        }

        let step = match event {
            ChannelEvent::TransportError(detail) => {
                self.on_transport_error(&detail);
                Step::Continue
            }
            ChannelEvent::State(snapshot) => self.on_state(snapshot)?,
            ChannelEvent::Logs(entry) => {
                self.on_log(&entry)?;
                Step::Continue
            }
            ChannelEvent::Backend => {
                self.on_complete();
                Step::Stop
            }
        };

        self.console.flush()?;
        Ok(step)
    }

    fn on_state(&mut self, snapshot: StateSnapshot) -> Result<Step> {
        if snapshot.id.is_none() {
            self.fail(DeploymentFailure::NotFound)?;
            return Ok(Step::Stop);
        }

        if snapshot.error {
            self.fail(DeploymentFailure::Errored)?;
            return Ok(Step::Stop);
        }

        if snapshot.backend {
            self.on_complete();
            return Ok(Step::Stop);
        }

        if let Some(logs) = snapshot.logs {
            tracing::debug!(count = logs.len(), "replaying snapshot logs");
            for entry in &logs {
                self.on_log(entry)?;
            }
        }

        Ok(Step::Continue)
    }

    fn on_log(&mut self, entry: &LogEntry) -> Result<()> {
        if !self.is_building() {
            if !self.config.quiet {
                self.console.line("> Building");
            }
            self.state = BuildState::Building;
        }

        if self.config.quiet {
            return Ok(());
        }

        let palette = self.console.palette();
        match &entry.kind {
            LogKind::Command => {
                self.console
                    .line(&format!("{} ▲ {}", palette.marker(), entry.data));
                self.lines.reset();
            }
            LogKind::Stderr => {
                let written = split_lines(&entry.data)
                    .try_for_each(|line| self.console.error_line(&palette.error(&format!("> {line}"))));
                // The window is gone from the screen even if stderr failed.
                self.lines.reset();
                written?;
            }
            LogKind::Stdout => {
                let marker = palette.marker();
                for line in split_lines(&entry.data) {
                    let line = match self.config.max_width {
                        Some(width) => fit_width(line, PREFIX_COLUMNS, width),
                        None => line.into(),
                    };
                    self.lines
                        .write(format!("{marker} {line}"), self.console.pending_mut());
                }
            }
            LogKind::Other(kind) => {
                tracing::debug!(%kind, "ignoring log entry of unknown type");
            }
        }

        Ok(())
    }

    fn on_complete(&mut self) {
        self.channel.disconnect();
        self.state = BuildState::Completed;
        tracing::debug!("build completed");
        self.lifecycle.emit(LifecycleEvent::Close);
    }

    fn on_transport_error(&mut self, detail: &str) {
        if self.transport_error_seen {
            tracing::debug!(detail, "ignoring repeated transport error");
            return;
        }
        self.transport_error_seen = true;

        if self.config.debug {
            self.console.line(&format!("> [debug] Socket error {detail}"));
        }
    }

    fn fail(&mut self, failure: DeploymentFailure) -> Result<()> {
        let written = self.console.error_line(failure.message());
        self.state = BuildState::Errored(failure);
        tracing::debug!(?failure, "deployment failed");
        self.lifecycle.emit(LifecycleEvent::Error(failure));
        written.map_err(Into::into)
    }
}

/// Split a payload into printable lines, dropping empty ones.
fn split_lines(data: &str) -> impl Iterator<Item = &str> {
    data.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
}
