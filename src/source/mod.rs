//! Transcript and editor-process sources.
//!
//! The transcript is re-read in full whenever its modification fingerprint
//! changes; there is no incremental tailing.

pub mod process;

pub use process::ProcessWatch;

use crate::model::{InputError, Transcript};
use crate::parser;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Modification time plus length; either changing means new content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

/// A transcript file watched for changes.
#[derive(Debug)]
pub struct TranscriptSource {
    path: PathBuf,
    last_seen: Option<Fingerprint>,
}

impl TranscriptSource {
    /// Watch `path`; the first [`poll_changed`](Self::poll_changed) reports a change.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_seen: None,
        }
    }

    /// Path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file currently exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Stat the file and report whether it changed since the last call.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file is gone and
    /// `InputError::Io` if it cannot be stat'ed.
    pub fn poll_changed(&mut self) -> Result<bool, InputError> {
        let meta = fs::metadata(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => InputError::FileNotFound {
                path: self.path.clone(),
            },
            _ => InputError::Io(e),
        })?;
        let current = Fingerprint {
            modified: meta.modified().ok(),
            len: meta.len(),
        };
        let changed = self.last_seen != Some(current);
        self.last_seen = Some(current);
        Ok(changed)
    }

    /// Forget the last fingerprint so the next poll reports a change.
    pub fn invalidate(&mut self) {
        self.last_seen = None;
    }

    /// Parse the whole transcript.
    ///
    /// # Errors
    ///
    /// See [`parser::parse_transcript`].
    pub fn load(&self, ctx_limit: u64) -> Result<Transcript, InputError> {
        parser::parse_transcript(&self.path, ctx_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("claude_pager_{}_{name}", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn first_poll_reports_change_then_settles() {
        let path = temp_file("first_poll.jsonl", "{}\n");
        let mut source = TranscriptSource::new(&path);

        assert!(source.poll_changed().unwrap());
        assert!(!source.poll_changed().unwrap());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn append_is_detected() {
        let path = temp_file("append.jsonl", "{}\n");
        let mut source = TranscriptSource::new(&path);
        source.poll_changed().unwrap();

        let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{\"type\":\"user\"}}").unwrap();
        drop(file);

        assert!(source.poll_changed().unwrap());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn invalidate_forces_change() {
        let path = temp_file("invalidate.jsonl", "{}\n");
        let mut source = TranscriptSource::new(&path);
        source.poll_changed().unwrap();
        source.invalidate();
        assert!(source.poll_changed().unwrap());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_reported() {
        let mut source = TranscriptSource::new("/nonexistent/claude_pager_missing.jsonl");
        assert!(!source.exists());
        assert!(matches!(source.poll_changed(), Err(InputError::FileNotFound { .. })));
    }

    #[test]
    fn load_parses_items() {
        let path = temp_file(
            "load.jsonl",
            r#"{"type":"user","message":{"content":"hello"}}"#,
        );
        let source = TranscriptSource::new(&path);
        let transcript = source.load(200_000).unwrap();
        assert_eq!(transcript.items.len(), 1);
        let _ = fs::remove_file(&path);
    }
}
