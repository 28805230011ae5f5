//! Tracing subscriber setup
//!
//! Diagnostics never go to stdout: that stream belongs to the build output
//! and its redraw arithmetic.

use crate::error::Result;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// The filter used when `RUST_LOG` is not set.
pub fn default_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { "buildtail=debug" } else { "buildtail=warn" })
    })
}

/// Build a subscriber writing plain-text records to `writer`.
pub fn build_subscriber<W>(writer: W, filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let fmt_layer = fmt::layer().with_writer(writer).with_ansi(false);

    tracing_subscriber::registry().with(fmt_layer).with(filter)
}

/// Install the global subscriber, logging to `log_file` or else stderr.
pub fn init(log_file: Option<&Path>, debug: bool) -> Result<()> {
    let filter = default_filter(debug);

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            build_subscriber(Arc::new(file), filter).try_init()?;
        }
        None => build_subscriber(std::io::stderr, filter).try_init()?,
    }

    Ok(())
}
