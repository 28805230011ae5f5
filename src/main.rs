//! Command-line entry point: follow one deployment's build stream.

use anyhow::{Context, Result as AnyhowResult};
use buildtail::{logging, BuildLogger, BuildState, ChannelHandle, LoggerConfig};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Follow a deployment's build logs
#[derive(Parser, Debug)]
#[command(name = "buildtail")]
#[command(about = "Stream a deployment's build output with a bounded, redrawn window", long_about = None)]
#[command(version)]
struct Args {
    /// Deployment host whose event stream is being followed
    #[arg(value_name = "HOST")]
    host: String,

    /// Read newline-delimited JSON events from this file instead of stdin
    #[arg(long, short, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Print transport errors and enable debug diagnostics
    #[arg(long)]
    debug: bool,

    /// Suppress build output; only report the outcome
    #[arg(long, short)]
    quiet: bool,

    /// Number of stdout lines kept on screen
    #[arg(long, value_name = "N", default_value_t = 10)]
    lines: usize,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn open_input(path: Option<&Path>) -> AnyhowResult<Box<dyn BufRead + Send>> {
    Ok(match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open event feed {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    })
}

fn config_from(args: &Args) -> LoggerConfig {
    let interactive = io::stdout().is_terminal();
    let max_width = if interactive {
        crossterm::terminal::size()
            .ok()
            .map(|(columns, _)| usize::from(columns))
    } else {
        None
    };

    LoggerConfig::default()
        .with_debug(args.debug)
        .with_quiet(args.quiet)
        .with_capacity(args.lines)
        .with_color(interactive && !args.no_color)
        .with_max_width(max_width)
}

fn run(args: &Args) -> AnyhowResult<BuildState> {
    logging::init(args.log_file.as_deref(), args.debug)
        .context("failed to set up diagnostics")?;

    let channel = ChannelHandle::from_reader(open_input(args.input.as_deref())?)
        .context("failed to start event feed")?;

    let mut logger = BuildLogger::new(args.host.clone(), channel, config_from(args));
    tracing::debug!(host = %args.host, config = ?logger.config(), "following build");

    logger.run().context("failed to render build output")
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(BuildState::Completed) => ExitCode::SUCCESS,
        Ok(BuildState::Errored(_)) => ExitCode::from(1),
        Ok(state) => {
            tracing::warn!(?state, "event stream ended before the build finished");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("buildtail: {e:#}");
            ExitCode::from(2)
        }
    }
}
