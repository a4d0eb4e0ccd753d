//! Terminal text measurement and wrapping (pure).
//!
//! Everything here treats escape sequences as zero-width so that column
//! arithmetic matches what the terminal displays.

pub mod ansi;
pub mod wrap;

pub use ansi::{char_width, contains_escapes, strip_escapes, visual_len};
pub use wrap::wrap_lines;
