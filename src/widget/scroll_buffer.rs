//! Scroll buffer: bounded window of the most recent output lines.
//!
//! The buffer mirrors what it has printed. When it is full, the next write
//! erases the printed block, drops the oldest line and reprints the rest,
//! so terminal growth stays bounded by the capacity.

use crate::terminal::OutputBuffer;
use std::collections::VecDeque;

/// Ring buffer of printed lines with in-place redraw on overflow.
#[derive(Debug)]
pub struct ScrollBuffer {
    /// Lines currently shown, oldest first.
    lines: VecDeque<String>,
    /// Maximum number of lines to retain.
    max_lines: usize,
}

impl ScrollBuffer {
    /// Create a new scroll buffer with the given capacity (at least 1).
    pub fn new(max_lines: usize) -> Self {
        let max_lines = max_lines.max(1);

        Self {
            lines: VecDeque::with_capacity(max_lines),
            max_lines,
        }
    }

    /// Maximum number of retained lines.
    pub const fn capacity(&self) -> usize {
        self.max_lines
    }

    /// Get the number of retained lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Retained lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Print a line through the window.
    ///
    /// At capacity, this queues an erase of `capacity + 1` rows (the retained
    /// block plus the cursor row below it), then reprints every line but the
    /// oldest before printing the new one.
    pub fn write(&mut self, line: String, out: &mut OutputBuffer) {
        if self.lines.len() == self.max_lines {
            out.cursor_hide();
            out.erase_lines(self.max_lines + 1);
            self.lines.pop_front();
            for retained in &self.lines {
                out.write_line(retained);
            }
            out.write_line(&line);
            out.cursor_show();
        } else {
            out.write_line(&line);
        }

        self.lines.push_back(line);
    }

    /// Forget all retained lines without touching the screen.
    ///
    /// Whatever is visible stays there; the next write starts a new window
    /// below it.
    pub fn reset(&mut self) {
        self.lines.clear();
    }
}
