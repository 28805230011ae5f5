//! Scroll Widget: bounded, self-redrawing window of recent output.
//!
//! Build output can run to thousands of lines. Printing all of it would
//! bury the command echoes and errors, so stdout lines go through a
//! [`ScrollBuffer`] that keeps only the newest few on screen.
//!
//! # Example
//!
//! ```rust
//! use buildtail::terminal::OutputBuffer;
//! use buildtail::widget::ScrollBuffer;
//!
//! let mut window = ScrollBuffer::new(2);
//! let mut out = OutputBuffer::new();
//! window.write("> one".to_string(), &mut out);
//! window.write("> two".to_string(), &mut out);
//! window.write("> three".to_string(), &mut out);
//! assert_eq!(window.lines().collect::<Vec<_>>(), ["> two", "> three"]);
//! ```

mod scroll_buffer;

pub use scroll_buffer::ScrollBuffer;
