//! Frame painting and the scoped screen guard.
//!
//! A frame is composed into one buffer and written with a single call, so
//! the terminal never shows a half-drawn viewport.

use crate::pager::{TerminalGeometry, ViewportSnapshot};
use crate::render::styles::{HEADER_DIM, RESET, RULE, SEPARATOR};
use std::fmt::Write as _;
use std::io::{self, Write};

/// Enable alternate scroll mode: the wheel arrives as arrow keys.
pub const MOUSE_ON: &str = "\x1b[?1007h";
/// Disable alternate scroll mode.
pub const MOUSE_OFF: &str = "\x1b[?1007l";
/// Hide the cursor.
pub const HIDE_CURSOR: &str = "\x1b[?25l";
/// Show the cursor.
pub const SHOW_CURSOR: &str = "\x1b[?25h";

const CLEAR_SCREEN: &str = "\x1b[2J";
const HOME: &str = "\x1b[H";
const CLEAR_EOL: &str = "\x1b[K";

/// Shown in place of content when there is no transcript.
pub const PLACEHOLDER: &str = "(transcript not found)";

/// Full-width horizontal separator.
pub fn separator(columns: usize) -> String {
    let rule: String = std::iter::repeat(RULE).take(columns).collect();
    format!("{SEPARATOR}{rule}{RESET}")
}

/// The "lines above" banner for a viewport scrolled by `offset`.
pub fn lines_above_banner(offset: usize) -> String {
    format!("{HEADER_DIM}  \u{2191} {offset} lines above  (scroll to view){RESET}")
}

/// Compose one frame of the viewport.
///
/// Row 1 is the top separator, then the optional banner and the visible rows,
/// blank filler up to the bottom separator at row `rows - 1`, and the status
/// line at row `rows`. `full_clear` wipes the screen first (first frame and
/// after a resize).
pub fn paint_frame(
    snapshot: &ViewportSnapshot,
    geometry: TerminalGeometry,
    status: &str,
    full_clear: bool,
) -> String {
    let mut buf = String::with_capacity(snapshot.rows.iter().map(String::len).sum::<usize>() + 512);
    let sep = separator(geometry.columns);

    buf.push_str(HIDE_CURSOR);
    if full_clear {
        buf.push_str(CLEAR_SCREEN);
    }
    buf.push_str(HOME);

    let _ = write!(buf, "{sep}{CLEAR_EOL}\n");
    let mut row = 2;

    if snapshot.has_banner() {
        let _ = write!(buf, "{}{CLEAR_EOL}\n", lines_above_banner(snapshot.offset));
        row += 1;
    }

    for line in &snapshot.rows {
        let _ = write!(buf, "{line}{CLEAR_EOL}\n");
        row += 1;
    }

    while row < geometry.rows.saturating_sub(1) {
        let _ = write!(buf, "{CLEAR_EOL}\n");
        row += 1;
    }

    let _ = write!(
        buf,
        "\x1b[{};1H{sep}{CLEAR_EOL}\x1b[{};1H{status}{CLEAR_EOL}",
        geometry.rows.saturating_sub(1).max(1),
        geometry.rows.max(1)
    );
    buf
}

/// Compose the screen shown when no transcript exists.
pub fn paint_placeholder(geometry: TerminalGeometry, status: &str) -> String {
    format!(
        "{CLEAR_SCREEN}{HOME}{HEADER_DIM}{PLACEHOLDER}{RESET}\n\x1b[{};1H{status}",
        geometry.rows.max(1)
    )
}

/// Enables the wheel protocol on creation; disables it and re-shows the
/// cursor when dropped.
pub struct ScreenGuard<W: Write> {
    out: W,
}

impl<W: Write> ScreenGuard<W> {
    /// Take over `out`.
    ///
    /// # Errors
    ///
    /// Returns the write error if the enable sequence cannot be written.
    pub fn new(mut out: W) -> io::Result<Self> {
        out.write_all(MOUSE_ON.as_bytes())?;
        out.flush()?;
        Ok(Self { out })
    }

    /// Write a composed frame and flush it.
    ///
    /// # Errors
    ///
    /// Returns the underlying write error.
    pub fn draw(&mut self, frame: &str) -> io::Result<()> {
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }

    /// The wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Drop for ScreenGuard<W> {
    fn drop(&mut self) {
        let restore = format!("{MOUSE_OFF}{SHOW_CURSOR}");
        if let Err(e) = self
            .out
            .write_all(restore.as_bytes())
            .and_then(|()| self.out.flush())
        {
            tracing::warn!(error = %e, "Failed to restore screen");
        }
    }
}
