//! Terminal output: buffered stdout, stderr, color palette and column helpers.

mod console;
mod output;
mod text;

pub use console::{Console, Palette};
pub use output::OutputBuffer;
pub use text::fit_width;
