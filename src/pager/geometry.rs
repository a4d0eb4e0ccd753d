//! Process-wide terminal geometry.
//!
//! Written only by [`reinit_geometry`] on the render loop; read by the pager
//! and by the input reader (page size).

use std::sync::{PoisonError, RwLock};

/// Rows taken by the top separator, bottom separator and status line.
pub const CHROME_ROWS: usize = 3;
/// Default column cap.
pub const DEFAULT_MAX_COLUMNS: usize = 120;

const FALLBACK_COLUMNS: usize = 100;
const FALLBACK_ROWS: usize = 24;

/// Terminal size as used for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalGeometry {
    /// Usable columns, capped at the configured maximum.
    pub columns: usize,
    /// Total terminal rows.
    pub rows: usize,
    /// Rows available for transcript content.
    pub content_rows: usize,
}

impl TerminalGeometry {
    /// Geometry for a `columns` × `rows` terminal.
    pub const fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            content_rows: rows.saturating_sub(CHROME_ROWS),
        }
    }

    /// Geometry assumed when the terminal size cannot be queried.
    pub const fn fallback() -> Self {
        Self::new(FALLBACK_COLUMNS, FALLBACK_ROWS)
    }
}

impl Default for TerminalGeometry {
    fn default() -> Self {
        Self::fallback()
    }
}

static GEOMETRY: RwLock<TerminalGeometry> = RwLock::new(TerminalGeometry::fallback());

/// Current process-wide geometry.
pub fn geometry() -> TerminalGeometry {
    *GEOMETRY.read().unwrap_or_else(PoisonError::into_inner)
}

/// Query the terminal size, cap the columns, and publish the result.
pub fn reinit_geometry(max_columns: usize) -> TerminalGeometry {
    let measured = match crossterm::terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => {
            TerminalGeometry::new(usize::from(cols), usize::from(rows))
        }
        Ok(_) => TerminalGeometry::fallback(),
        Err(e) => {
            tracing::debug!(error = %e, "Terminal size unavailable, using fallback");
            TerminalGeometry::fallback()
        }
    };
    let capped = TerminalGeometry {
        columns: measured.columns.min(max_columns.max(1)),
        ..measured
    };
    set_geometry(capped);
    capped
}

/// Publish `geometry` as the process-wide value.
pub fn set_geometry(geometry: TerminalGeometry) {
    *GEOMETRY.write().unwrap_or_else(PoisonError::into_inner) = geometry;
    tracing::debug!(
        columns = geometry.columns,
        rows = geometry.rows,
        content_rows = geometry.content_rows,
        "Terminal geometry updated"
    );
}
