//! ANSI styling constants for rendered transcript lines.
//!
//! Colours are 24-bit SGR sequences; every decorated span ends with
//! [`RESET`] so styles never bleed into the next visual row.

/// Reset all attributes.
pub const RESET: &str = "\x1b[0m";
/// Bold.
pub const BOLD: &str = "\x1b[1m";
/// Dim / faint.
pub const DIM: &str = "\x1b[2m";
/// Italic.
pub const ITALIC: &str = "\x1b[3m";
/// Underline on.
pub const UNDERLINE_ON: &str = "\x1b[4m";
/// Underline off.
pub const UNDERLINE_OFF: &str = "\x1b[24m";

/// Human turn marker.
pub const HUMAN_ICON: &str = "\x1b[38;2;255;165;0m";
/// Assistant body text.
pub const ASSISTANT_TEXT: &str = "\x1b[38;2;204;204;204m";
/// Tool-use line.
pub const TOOL_NAME: &str = "\x1b[38;2;160;100;255m";
/// Tool-result body.
pub const TOOL_RESULT: &str = "\x1b[38;2;110;110;110m";
/// Tool-result body when the tool failed.
pub const TOOL_ERROR: &str = "\x1b[38;2;220;80;80m";
/// Inline `code` spans.
pub const CODE_INLINE: &str = "\x1b[38;2;97;175;239m";
/// Fenced code background.
pub const CODE_BG: &str = "\x1b[48;2;35;35;35m";
/// Fenced code foreground when not highlighted.
pub const CODE_FG: &str = "\x1b[38;2;200;230;200m";
/// Separators and rules.
pub const SEPARATOR: &str = "\x1b[38;2;80;80;80m";
/// Secondary text (footers, banners).
pub const HEADER_DIM: &str = "\x1b[38;2;100;100;100m";
/// Status-line banner.
pub const BANNER: &str = "\x1b[1;33m";
/// Auto-linked URLs.
pub const LINK_URL: &str = "\x1b[38;2;255;165;0m";
/// Connector glyph joining a tool result to its tool call.
pub const CONNECTOR: &str = "\x1b[38;2;60;60;80m";

/// Diff addition.
pub const DIFF_ADD: &str = "\x1b[38;2;100;220;100m";
/// Diff removal.
pub const DIFF_REMOVE: &str = "\x1b[38;2;220;80;80m";
/// Diff hunk header.
pub const DIFF_HUNK: &str = "\x1b[38;2;100;150;255m";

/// Context bar below 60 %.
pub const BAR_LOW: &str = "\x1b[38;2;100;220;100m";
/// Context bar below 85 %.
pub const BAR_MID: &str = "\x1b[38;2;255;165;0m";
/// Context bar at or above 85 %.
pub const BAR_HIGH: &str = "\x1b[38;2;255;80;80m";

/// Horizontal rule glyph.
pub const RULE: char = '\u{2500}';
/// Ellipsis glyph.
pub const ELLIPSIS: char = '\u{2026}';
