//! Console: the pair of output streams a logger writes to.

use super::output::OutputBuffer;
use crossterm::style::Stylize;
use std::io::{self, Stderr, Stdout, Write};

/// Colors used for log decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Whether to emit color sequences at all.
    pub color: bool,
}

impl Palette {
    /// The `>` marker that prefixes command echoes and stdout lines.
    pub fn marker(self) -> String {
        if self.color {
            ">".dark_grey().to_string()
        } else {
            ">".to_string()
        }
    }

    /// Render an error line.
    pub fn error(self, text: &str) -> String {
        if self.color {
            text.dark_red().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Output and error streams plus the pending stdout buffer.
///
/// Stdout writes are queued in an [`OutputBuffer`] and flushed once per
/// event. Error lines flush the pending stdout first so both streams keep
/// their relative order on a shared terminal.
pub struct Console<O = Stdout, E = Stderr> {
    out: O,
    err: E,
    pending: OutputBuffer,
    palette: Palette,
}

impl Console<Stdout, Stderr> {
    /// A console on the process's stdout and stderr.
    pub fn stdio(palette: Palette) -> Self {
        Self::new(io::stdout(), io::stderr(), palette)
    }
}

impl<O: Write, E: Write> Console<O, E> {
    /// Create a console over arbitrary writers.
    pub fn new(out: O, err: E, palette: Palette) -> Self {
        Self {
            out,
            err,
            pending: OutputBuffer::new(),
            palette,
        }
    }

    /// The palette in use.
    pub const fn palette(&self) -> Palette {
        self.palette
    }

    /// The output writer.
    pub const fn out(&self) -> &O {
        &self.out
    }

    /// The error writer.
    pub const fn err(&self) -> &E {
        &self.err
    }

    /// The pending stdout buffer, for callers that queue their own sequences.
    pub fn pending_mut(&mut self) -> &mut OutputBuffer {
        &mut self.pending
    }

    /// Queue a line for stdout.
    pub fn line(&mut self, text: &str) {
        self.pending.write_line(text);
    }

    /// Write a line to stderr immediately.
    pub fn error_line(&mut self, text: &str) -> io::Result<()> {
        self.flush()?;
        writeln!(self.err, "{text}")?;
        self.err.flush()
    }

    /// Flush pending stdout output in one write.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.pending.flush_to(&mut self.out)?;
        self.pending.clear();
        Ok(())
    }

    /// Take the writers back, flushing anything pending.
    pub fn into_inner(mut self) -> io::Result<(O, E)> {
        self.flush()?;
        Ok((self.out, self.err))
    }
}
