//! Escape-sequence stripping and column-width measurement.

use regex::Regex;
use std::sync::LazyLock;
use unicode_width::UnicodeWidthChar;

/// Matches CSI sequences (`ESC [ ... final`), OSC strings terminated by BEL
/// or ST (`ESC ] ... BEL`), and two-byte `ESC x` sequences.
static ESCAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[[^a-zA-Z]*[a-zA-Z]|\][^\x07\x1b]*(?:\x07|\x1b\\)|[^\[\]])")
        .unwrap_or_else(|e| unreachable!("escape pattern is valid: {e}"))
});

/// Remove every recognised escape sequence from `s`.
///
/// Unterminated sequences are left alone; their lone `ESC` byte measures
/// zero columns anyway.
pub fn strip_escapes(s: &str) -> std::borrow::Cow<'_, str> {
    ESCAPE_RE.replace_all(s, "")
}

/// True when `s` contains at least one recognised escape sequence.
pub fn contains_escapes(s: &str) -> bool {
    ESCAPE_RE.is_match(s)
}

/// Column width of a single character.
///
/// Control characters (below U+0020) are zero width, East-Asian Wide and
/// Fullwidth glyphs are two columns, everything else is one.
pub fn char_width(c: char) -> usize {
    if (c as u32) < 0x20 {
        0
    } else if UnicodeWidthChar::width(c) == Some(2) {
        2
    } else {
        1
    }
}

/// Number of terminal columns `s` occupies once escapes are stripped.
pub fn visual_len(s: &str) -> usize {
    strip_escapes(s).chars().map(char_width).sum()
}
