//! Logical line → visual row wrapping.
//!
//! Escape-free lines are hard-wrapped at whitespace, with oversized words
//! split at the column limit. Lines carrying escape sequences are never
//! reflowed (cutting them could split a sequence in half); instead they stay
//! whole on one row followed by empty continuation rows, so that the number
//! of rows, and therefore every scroll offset, matches what the terminal
//! actually displays.

use super::ansi::{char_width, contains_escapes, visual_len};

/// Expand logical lines into visual rows of at most `width` columns.
///
/// A `width` of zero is treated as one.
pub fn wrap_lines<S: AsRef<str>>(lines: &[S], width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::with_capacity(lines.len());

    for line in lines {
        let line = line.as_ref();
        let len = visual_len(line);
        if len <= width {
            rows.push(line.to_string());
            continue;
        }

        if contains_escapes(line) {
            let visual_rows = len.div_ceil(width).max(1);
            rows.push(line.to_string());
            rows.extend(std::iter::repeat_n(String::new(), visual_rows - 1));
        } else {
            rows.extend(hard_wrap(line, width));
        }
    }

    rows
}

/// Greedy word wrap of escape-free text.
///
/// Whitespace at the start of the first row is kept (indentation), whitespace
/// at row boundaries is dropped.
fn hard_wrap(line: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for chunk in chunks(line) {
        let chunk_width: usize = chunk.chars().map(char_width).sum();
        let is_space = chunk.starts_with(char::is_whitespace);

        if is_space {
            if current.is_empty() && !rows.is_empty() {
                continue;
            }
            if current_width + chunk_width <= width {
                current.push_str(chunk);
                current_width += chunk_width;
            } else {
                finish_row(&mut rows, &mut current, &mut current_width);
            }
            continue;
        }

        if current_width + chunk_width <= width {
            current.push_str(chunk);
            current_width += chunk_width;
            continue;
        }

        if chunk_width <= width {
            finish_row(&mut rows, &mut current, &mut current_width);
            current.push_str(chunk);
            current_width = chunk_width;
            continue;
        }

        // Oversized word: fill the current row, then split the rest.
        for c in chunk.chars() {
            let w = char_width(c);
            if current_width + w > width && current_width > 0 {
                finish_row(&mut rows, &mut current, &mut current_width);
            }
            current.push(c);
            current_width += w;
        }
    }

    if !current.trim_end().is_empty() {
        rows.push(current.trim_end().to_string());
    }
    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

fn finish_row(rows: &mut Vec<String>, current: &mut String, current_width: &mut usize) {
    let trimmed = current.trim_end();
    if !trimmed.is_empty() {
        rows.push(trimmed.to_string());
    }
    current.clear();
    *current_width = 0;
}

/// Split into alternating runs of whitespace and non-whitespace.
fn chunks(line: &str) -> impl Iterator<Item = &str> {
    let mut rest = line;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != space)
            .map_or(rest.len(), |(i, _)| i);
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}
