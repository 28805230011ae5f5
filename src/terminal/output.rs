//! `OutputBuffer`: Single-syscall output buffer for log lines and ANSI sequences.

use crossterm::cursor::{Hide, MoveToColumn, MoveUp, Show};
use crossterm::terminal::{Clear, ClearType};
use crossterm::Command;
use std::io::Write;

/// Pre-allocated buffer for building terminal output.
///
/// Everything produced while handling one event is accumulated here, then
/// flushed in a single `write()` syscall so an erase-and-redraw never shows
/// up half-done.
#[derive(Debug)]
pub struct OutputBuffer {
    data: String,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: String::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a screenful of log lines (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string followed by a newline.
    #[inline]
    pub fn write_line(&mut self, s: &str) {
        self.data.push_str(s);
        self.data.push('\n');
    }

    /// Queue a crossterm command as its ANSI sequence.
    #[inline]
    fn queue<C: Command>(&mut self, command: &C) {
        // Formatting into a String cannot fail.
        let _ = command.write_ansi(&mut self.data);
    }

    /// Erase `count` lines ending at the cursor line, leaving the cursor
    /// at column 0 of the topmost erased line.
    pub fn erase_lines(&mut self, count: usize) {
        for i in 0..count {
            self.queue(&Clear(ClearType::CurrentLine));
            if i + 1 < count {
                self.queue(&MoveUp(1));
            }
        }
        if count > 0 {
            self.queue(&MoveToColumn(0));
        }
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.queue(&Hide);
    }

    /// Show cursor.
    #[inline]
    pub fn cursor_show(&mut self) {
        self.queue(&Show);
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.data.as_bytes())?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_line_appends_newline() {
        let mut out = OutputBuffer::new();
        out.write_line("> one");
        out.write_line("> two");
        assert_eq!(out.as_str(), "> one\n> two\n");
    }

    #[test]
    fn test_erase_lines_sequence() {
        let mut out = OutputBuffer::new();
        out.erase_lines(3);
        assert_eq!(
            out.as_str(),
            "\x1b[2K\x1b[1A\x1b[2K\x1b[1A\x1b[2K\x1b[1G"
        );
    }

    #[test]
    fn test_erase_zero_lines_is_empty() {
        let mut out = OutputBuffer::new();
        out.erase_lines(0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_flush_to_writer() {
        let mut out = OutputBuffer::new();
        out.write_line("hello");
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hello\n");
    }
}
