//! Error types for claude-pager.
//!
//! Errors are layered with `thiserror` and compose via `?` and `From`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned from `main`
//!   - [`InputError`] - Transcript reading failures (file not found, IO)
//!   - [`TtyError`] - Controlling-terminal device failures
//!   - [`ConfigError`](crate::config::ConfigError) - Config file failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Log file setup failures
//!   - `std::io::Error` - Terminal output failures
//!
//! # Error Recovery Strategy
//!
//! Only startup errors are fatal. Inside the render loop, parse errors are
//! per-record and skipped ([`ParseError`] is only ever logged), and a failed
//! content update or draw is logged while the last good viewport stays on
//! screen. A [`TtyError`] disables interactive scrolling but never stops the
//! pager.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read the transcript.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Debug logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Writing to the terminal failed.
    ///
    /// Without a working output stream the pager cannot do anything useful,
    /// so this propagates out of the render loop's setup phase.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors encountered when reading the transcript file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The transcript does not exist at the given path.
    ///
    /// **When this occurs**: at startup, or when the file disappears between
    /// the change check and the re-read.
    ///
    /// **Recovery**: at startup the pager shows a "transcript not found"
    /// placeholder; during the loop the tick is logged and skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use claude_pager::model::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl"),
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was attempted.
        path: PathBuf,
    },

    /// Any other I/O failure while reading or stat'ing the transcript.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single transcript record was skipped.
///
/// Never propagated: the parser logs it at debug level and moves on to the
/// next line.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line is not valid JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use claude_pager::model::ParseError;
    ///
    /// let err = ParseError::InvalidJson {
    ///     line: 42,
    ///     message: "expected value".to_string(),
    /// };
    /// assert!(err.to_string().contains("line 42"));
    /// ```
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// 1-based line number in the transcript.
        line: usize,
        /// Message from `serde_json`.
        message: String,
    },

    /// The line is JSON but not an object with a recognised `type`.
    #[error("Unrecognised record at line {line}")]
    UnknownRecord {
        /// 1-based line number in the transcript.
        line: usize,
    },
}

/// Errors raised while acquiring the controlling terminal for raw input.
///
/// All variants are non-fatal to the process: the pager keeps drawing but
/// interactive scrolling is disabled.
#[derive(Debug, Error)]
pub enum TtyError {
    /// `/dev/tty` could not be opened (no controlling terminal).
    #[error("Failed to open {path}: {source}")]
    Open {
        /// Device path.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing terminal attributes failed.
    #[error("Failed to {op} terminal attributes: {source}")]
    Attributes {
        /// `"read"` or `"set"`.
        op: &'static str,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The input thread could not be spawned.
    #[error("Failed to spawn input thread: {0}")]
    Spawn(#[source] std::io::Error),
}
