//! Diff detection and per-line diff colouring for tool results.

use super::styles::{DIFF_ADD, DIFF_HUNK, DIFF_REMOVE};

fn is_addition(line: &str) -> bool {
    line.starts_with('+') && !line.starts_with("+++")
}

fn is_removal(line: &str) -> bool {
    line.starts_with('-') && !line.starts_with("---")
}

/// True when `text` has at least one added and one removed line.
///
/// File headers (`+++`, `---`) do not count on their own, so a YAML
/// document separator or a bulleted list is not mistaken for a diff.
pub fn is_diff(text: &str) -> bool {
    let mut added = false;
    let mut removed = false;
    for line in text.lines() {
        added |= is_addition(line);
        removed |= is_removal(line);
        if added && removed {
            return true;
        }
    }
    false
}

/// Colour for one line of a diff, falling back to `base`.
pub fn line_style<'a>(line: &str, base: &'a str) -> &'a str {
    if is_addition(line) {
        DIFF_ADD
    } else if is_removal(line) {
        DIFF_REMOVE
    } else if line.starts_with("@@") {
        DIFF_HUNK
    } else {
        base
    }
}
