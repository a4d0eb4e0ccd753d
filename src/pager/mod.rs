//! Viewport state machine over the wrapped visual rows.
//!
//! The pager owns the row sequence, the scroll offset and the follow flag
//! behind one [`Mutex`]. Every operation takes the lock for its whole
//! duration and never performs I/O while holding it, so a
//! [`snapshot`](Pager::snapshot) is always internally consistent.
//!
//! # Follow mode
//!
//! ```text
//!              Delta(n) / Top
//!  Following ─────────────────▶ Manual
//!      ▲                          │
//!      └──────── Bottom ──────────┘
//! ```
//!
//! While following, every content replacement re-pins the viewport to the
//! natural bottom. In manual mode the offset is kept and only clamped.

pub mod geometry;

pub use geometry::{geometry, reinit_geometry, set_geometry, TerminalGeometry};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// A scroll request decoded from terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEvent {
    /// Move by `n` rows; negative is up.
    Delta(isize),
    /// Jump to the first row.
    Top,
    /// Jump to the natural bottom and resume following.
    Bottom,
}

/// Whether the viewport tracks new content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowMode {
    /// Pinned to the bottom; new content scrolls into view.
    #[default]
    Following,
    /// Position chosen by the user; preserved across updates.
    Manual,
}

/// Where the pager takes its content height from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportHeight {
    /// `content_rows` of the process-wide [`TerminalGeometry`].
    Terminal,
    /// A fixed number of content rows.
    Fixed(usize),
}

/// Consistent view of the pager at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportSnapshot {
    /// Rows to paint, top to bottom.
    pub rows: Vec<String>,
    /// Index of the first visible row; also the number of rows above.
    pub offset: usize,
    /// Total number of rows in the content.
    pub total: usize,
}

impl ViewportSnapshot {
    /// True when a "lines above" banner takes the first content row.
    pub fn has_banner(&self) -> bool {
        self.offset > 0
    }
}

#[derive(Debug, Default)]
struct ViewportState {
    rows: Vec<String>,
    offset: usize,
    follow: FollowMode,
}

/// Offset that shows the last rows, leaving room for the banner.
fn natural_bottom(len: usize, content_rows: usize) -> usize {
    if len <= content_rows {
        0
    } else {
        len.saturating_sub(content_rows.saturating_sub(1).max(1))
    }
}

fn max_offset(len: usize) -> usize {
    len.saturating_sub(1)
}

/// Thread-safe scrollable viewport.
#[derive(Debug)]
pub struct Pager {
    state: Mutex<ViewportState>,
    height: ViewportHeight,
}

impl Pager {
    /// Pager sized by the terminal geometry.
    pub fn new() -> Self {
        Self::with_height(ViewportHeight::Terminal)
    }

    /// Pager with an explicit height source.
    pub fn with_height(height: ViewportHeight) -> Self {
        Self {
            state: Mutex::new(ViewportState::default()),
            height,
        }
    }

    fn content_rows(&self) -> usize {
        match self.height {
            ViewportHeight::Terminal => geometry().content_rows,
            ViewportHeight::Fixed(rows) => rows,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in a new row sequence.
    ///
    /// Following: re-pin to the natural bottom. Manual: keep the offset,
    /// clamped into the new range.
    pub fn replace_content(&self, rows: Vec<String>) {
        let content_rows = self.content_rows();
        let mut state = self.lock();
        state.offset = match state.follow {
            FollowMode::Following => natural_bottom(rows.len(), content_rows),
            FollowMode::Manual => state.offset.min(max_offset(rows.len())),
        };
        state.rows = rows;
    }

    /// Apply one scroll event.
    pub fn scroll(&self, event: ScrollEvent) {
        let content_rows = self.content_rows();
        let mut state = self.lock();
        Self::apply(&mut state, event, content_rows);
    }

    /// Apply a drained batch of events in order under a single lock.
    ///
    /// Returns whether any event was applied.
    pub fn apply_all<I>(&self, events: I) -> bool
    where
        I: IntoIterator<Item = ScrollEvent>,
    {
        let content_rows = self.content_rows();
        let mut state = self.lock();
        let mut applied = false;
        for event in events {
            Self::apply(&mut state, event, content_rows);
            applied = true;
        }
        applied
    }

    fn apply(state: &mut ViewportState, event: ScrollEvent, content_rows: usize) {
        let len = state.rows.len();
        match event {
            ScrollEvent::Delta(n) => {
                state.offset = state.offset.saturating_add_signed(n).min(max_offset(len));
                state.follow = FollowMode::Manual;
            }
            ScrollEvent::Top => {
                state.offset = 0;
                state.follow = FollowMode::Manual;
            }
            ScrollEvent::Bottom => {
                state.offset = natural_bottom(len, content_rows);
                state.follow = FollowMode::Following;
            }
        }
    }

    /// Visible rows, offset and total, read atomically.
    ///
    /// When scrolled away from the top, one row is reserved for the
    /// "lines above" banner.
    pub fn snapshot(&self) -> ViewportSnapshot {
        let content_rows = self.content_rows();
        let state = self.lock();
        let visible = if state.offset > 0 {
            content_rows.saturating_sub(1)
        } else {
            content_rows
        };
        let start = state.offset.min(state.rows.len());
        let end = start.saturating_add(visible).min(state.rows.len());
        ViewportSnapshot {
            rows: state.rows[start..end].to_vec(),
            offset: state.offset,
            total: state.rows.len(),
        }
    }

    /// Current follow mode.
    pub fn follow_mode(&self) -> FollowMode {
        self.lock().follow
    }

    /// Current scroll offset.
    pub fn offset(&self) -> usize {
        self.lock().offset
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    /// True when no content has been loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "pager_tests.rs"]
mod tests;
