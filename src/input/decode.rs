//! Raw terminal bytes → input events (pure).
//!
//! One read chunk yields at most one scroll event. Arrow keys are counted
//! and coalesced, which also folds wheel notches together: with alternate
//! scroll mode the terminal reports the wheel as arrow sequences.

use super::InputEvent;
use crate::pager::ScrollEvent;
use regex::bytes::Regex;
use std::sync::LazyLock;

/// A trailing `ESC`, `ESC O`, or `ESC [` with no final byte yet.
static PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)\x1b(?:O?|\[[^a-zA-Z~]*)\z")
        .unwrap_or_else(|e| unreachable!("partial escape pattern is valid: {e}"))
});

const ARROW_UP: &[&[u8]] = &[b"\x1b[A", b"\x1bOA"];
const ARROW_DOWN: &[&[u8]] = &[b"\x1b[B", b"\x1bOB"];
const PAGE_UP: &[&[u8]] = &[b"\x1b[5~"];
const PAGE_DOWN: &[&[u8]] = &[b"\x1b[6~"];
const HOME: &[&[u8]] = &[b"\x1b[H", b"\x1b[1~", b"\x1bOH"];
const END: &[&[u8]] = &[b"\x1b[F", b"\x1b[4~", b"\x1bOF"];

/// Result of decoding one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decoded {
    /// Events in the order they should be applied.
    pub events: Vec<InputEvent>,
    /// Incomplete trailing escape sequence to prepend to the next chunk.
    pub remainder: Vec<u8>,
}

/// Decode `bytes`; page keys move by `content_rows - 1` rows.
pub fn decode(bytes: &[u8], content_rows: usize) -> Decoded {
    let (complete, remainder) = match PARTIAL_RE.find(bytes) {
        Some(m) => bytes.split_at(m.start()),
        None => (bytes, &[][..]),
    };

    let mut events = Vec::new();
    if let Some(scroll) = scroll_event(complete, content_rows) {
        events.push(InputEvent::Scroll(scroll));
    }
    if wants_quit(complete) {
        events.push(InputEvent::Quit);
    }

    Decoded {
        events,
        remainder: remainder.to_vec(),
    }
}

fn scroll_event(bytes: &[u8], content_rows: usize) -> Option<ScrollEvent> {
    let page = isize::try_from(content_rows.saturating_sub(1).max(1)).unwrap_or(isize::MAX);

    let ups = count_all(bytes, ARROW_UP);
    if ups > 0 {
        return Some(ScrollEvent::Delta(-ups));
    }
    let downs = count_all(bytes, ARROW_DOWN);
    if downs > 0 {
        return Some(ScrollEvent::Delta(downs));
    }
    if contains_any(bytes, PAGE_UP) {
        return Some(ScrollEvent::Delta(-page));
    }
    if contains_any(bytes, PAGE_DOWN) {
        return Some(ScrollEvent::Delta(page));
    }
    if contains_any(bytes, HOME) {
        return Some(ScrollEvent::Top);
    }
    if contains_any(bytes, END) {
        return Some(ScrollEvent::Bottom);
    }
    None
}

fn count_all(haystack: &[u8], needles: &[&[u8]]) -> isize {
    let total: usize = needles.iter().map(|n| count(haystack, n)).sum();
    isize::try_from(total).unwrap_or(isize::MAX)
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

fn contains_any(haystack: &[u8], needles: &[&[u8]]) -> bool {
    needles.iter().any(|n| count(haystack, n) > 0)
}

/// True when `q` or `Q` was typed outside any escape sequence.
fn wants_quit(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b => i += escape_len(&bytes[i..]),
            b'q' | b'Q' => return true,
            _ => i += 1,
        }
    }
    false
}

/// Length of the escape sequence at the start of `bytes`.
fn escape_len(bytes: &[u8]) -> usize {
    match bytes.get(1) {
        Some(b'[') => bytes[2..]
            .iter()
            .position(|b| (0x40..=0x7e).contains(b))
            .map_or(bytes.len(), |p| p + 3),
        Some(b'O') => 3.min(bytes.len()),
        Some(_) => 2,
        None => 1,
    }
}
