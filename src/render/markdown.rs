//! Markdown subset for assistant text.
//!
//! Supported: `#`..`######` headers, `-`/`*` bullets, numbered lists, fenced
//! code blocks, and inline `**bold**`, `*italic*` and `` `code` `` spans.
//! Anything else is passed through as plain assistant text.

use super::expand_tabs;
use super::highlighter::SyntaxHighlighter;
use super::links::{linkify, looks_like_path, looks_like_url, osc8_file, osc8_url};
use super::styles::{
    ASSISTANT_TEXT, BOLD, CODE_BG, CODE_FG, CODE_INLINE, DIM, ITALIC, RESET, RULE, SEPARATOR,
};
use crate::text::visual_len;
use regex::Regex;
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})\s+(.*)$").unwrap_or_else(|e| unreachable!("invalid regex: {e}"))
});
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)[-*]\s+(.*)$").unwrap_or_else(|e| unreachable!("invalid regex: {e}"))
});
static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)(\d+)\.\s+(.*)$").unwrap_or_else(|e| unreachable!("invalid regex: {e}"))
});

/// An open ```` ``` ```` block collecting its lines.
struct CodeFence<'a> {
    language: Option<&'a str>,
    lines: Vec<&'a str>,
}

/// Render assistant markdown into logical lines appended to `out`.
pub fn render_markdown(
    text: &str,
    columns: usize,
    highlighter: Option<&SyntaxHighlighter>,
    out: &mut Vec<String>,
) {
    let mut fence: Option<CodeFence<'_>> = None;

    for line in text.lines() {
        if let Some(info) = line.trim_start().strip_prefix("```") {
            match fence.take() {
                Some(open) => render_code_block(&open, columns, highlighter, out),
                None => {
                    fence = Some(CodeFence {
                        language: info.split_whitespace().next(),
                        lines: Vec::new(),
                    });
                }
            }
            continue;
        }

        if let Some(open) = fence.as_mut() {
            open.lines.push(line);
            continue;
        }

        match HEADER_RE.captures(line) {
            Some(caps) => render_header(caps[1].len(), &caps[2], columns, out),
            None => out.push(render_block_line(line)),
        }
    }

    if let Some(open) = fence {
        render_code_block(&open, columns, highlighter, out);
    }
}

fn render_header(level: usize, title: &str, columns: usize, out: &mut Vec<String>) {
    if level <= 2 {
        let base = format!("{BOLD}{ASSISTANT_TEXT}");
        out.push(String::new());
        out.push(format!("{base}{}{RESET}", render_inline(title, &base)));
        if level == 1 {
            let width = (visual_len(title) + 2).min(columns);
            out.push(format!("{SEPARATOR}{}{RESET}", RULE.to_string().repeat(width)));
        }
    } else {
        let base = format!("{BOLD}{DIM}{ASSISTANT_TEXT}");
        out.push(format!("{base}{}{RESET}", render_inline(title, &base)));
    }
}

fn render_block_line(line: &str) -> String {
    if line.trim().is_empty() {
        return String::new();
    }

    if let Some(caps) = BULLET_RE.captures(line) {
        return format!(
            "{}{ASSISTANT_TEXT}\u{2022} {}{RESET}",
            &caps[1],
            render_inline(&caps[2], ASSISTANT_TEXT)
        );
    }

    if let Some(caps) = NUMBERED_RE.captures(line) {
        return format!(
            "{}{ASSISTANT_TEXT}{}. {}{RESET}",
            &caps[1],
            &caps[2],
            render_inline(&caps[3], ASSISTANT_TEXT)
        );
    }

    format!("{ASSISTANT_TEXT}{}{RESET}", render_inline(line, ASSISTANT_TEXT))
}

fn render_code_block(
    fence: &CodeFence<'_>,
    columns: usize,
    highlighter: Option<&SyntaxHighlighter>,
    out: &mut Vec<String>,
) {
    if fence.lines.is_empty() {
        return;
    }
    let plain: Vec<String> = fence.lines.iter().map(|l| expand_tabs(l).into_owned()).collect();
    let code_width = columns.saturating_sub(4);

    let highlighted = highlighter
        .and_then(|h| h.highlight_code(&plain.join("\n"), fence.language))
        .filter(|rows| rows.len() == plain.len());

    for (i, line) in plain.iter().enumerate() {
        let pad = " ".repeat(code_width.saturating_sub(visual_len(line)));
        match &highlighted {
            Some(rows) => out.push(format!("{CODE_BG}  {}{pad}{RESET}", rows[i])),
            None => out.push(format!("{CODE_BG}{CODE_FG}  {line}{pad}{RESET}")),
        }
    }
}

enum Span {
    Bold,
    Italic,
    Code,
}

/// Locate an inline span at the start of `rest`: (kind, inner, total length).
fn span_at(rest: &str) -> Option<(Span, &str, usize)> {
    if let Some(after) = rest.strip_prefix("**") {
        let end = after.find("**").filter(|&n| n > 0)?;
        return Some((Span::Bold, &after[..end], end + 4));
    }
    if let Some(after) = rest.strip_prefix('`') {
        let end = after.find('`').filter(|&n| n > 0)?;
        return Some((Span::Code, &after[..end], end + 2));
    }
    if let Some(after) = rest.strip_prefix('*') {
        if after.starts_with(|c: char| c.is_whitespace() || c == '*') {
            return None;
        }
        let end = after.find('*').filter(|&n| n > 0)?;
        let inner = &after[..end];
        if inner.ends_with(char::is_whitespace) || after[end + 1..].starts_with('*') {
            return None;
        }
        return Some((Span::Italic, inner, end + 2));
    }
    None
}

/// Render inline spans of one line; `base` is re-applied after each span.
///
/// Plain runs are auto-linked. Inline code is linked only when it looks like
/// an absolute path or a URL.
pub fn render_inline(text: &str, base: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut plain_start = 0;
    let mut i = 0;

    while let Some(c) = text[i..].chars().next() {
        let Some((span, inner, len)) = span_at(&text[i..]) else {
            i += c.len_utf8();
            continue;
        };

        out.push_str(&linkify(&text[plain_start..i], base));
        match span {
            Span::Bold => {
                let style = format!("{base}{BOLD}");
                out.push_str(&format!("{BOLD}{}{RESET}{base}", linkify(inner, &style)));
            }
            Span::Italic => {
                let style = format!("{base}{ITALIC}");
                out.push_str(&format!("{ITALIC}{}{RESET}{base}", linkify(inner, &style)));
            }
            Span::Code => {
                let linked = if looks_like_path(inner) && inner.chars().count() > 3 {
                    osc8_file(inner, None)
                } else if looks_like_url(inner) {
                    osc8_url(inner, None)
                } else {
                    inner.to_string()
                };
                out.push_str(&format!("{CODE_INLINE}{linked}{RESET}{base}"));
            }
        }
        i += len;
        plain_start = i;
    }

    out.push_str(&linkify(&text[plain_start..], base));
    out
}
