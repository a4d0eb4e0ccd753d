//! claude-pager
//!
//! Live, scrollable terminal view of a Claude Code conversation transcript,
//! shown while an external editor is open.
//!
//! Pure core: [`parser`], [`render`], [`text`], [`pager`] and
//! [`integration`]. Impure shell: [`source`], [`input`] and [`view`].

pub mod config;
pub mod input;
pub mod logging;
pub mod model;
pub mod pager;
pub mod parser;
pub mod render;
pub mod source;
pub mod text;
pub mod view;

// Re-export main loop integration
pub mod integration;
