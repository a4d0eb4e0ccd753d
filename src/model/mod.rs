//! Domain model types (pure).

pub mod error;
pub mod item;
pub mod usage;

pub use error::{AppError, InputError, ParseError, TtyError};
pub use item::{Item, ItemKind, MAX_LABEL_CHARS};
pub use usage::{UsageSummary, DEFAULT_CTX_LIMIT};

/// Parser output: items in file order plus the latest usage, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    /// Semantic items in file order.
    pub items: Vec<Item>,
    /// Usage from the most recent usage record; `None` when none was seen.
    pub usage: Option<UsageSummary>,
}
