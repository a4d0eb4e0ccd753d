//! Item → decorated logical lines.
//!
//! Rendering is pure and infallible: every [`Item`] sequence produces text,
//! and every emitted line carries its own styles and ends reset, so lines can
//! be wrapped and sliced independently.

pub mod diff;
pub mod highlighter;
pub mod links;
pub mod markdown;
pub mod styles;

pub use highlighter::SyntaxHighlighter;

use crate::model::{Item, ItemKind};
use std::borrow::Cow;
use styles::{
    BOLD, CONNECTOR, DIM, ELLIPSIS, HEADER_DIM, HUMAN_ICON, RESET, TOOL_ERROR, TOOL_NAME,
    TOOL_RESULT,
};

/// Default number of human-turn lines shown before truncation.
pub const DEFAULT_HUMAN_MAX_LINES: usize = 20;
/// Default number of tool-result lines shown before truncation.
pub const DEFAULT_RESULT_MAX_LINES: usize = 6;

const TAB_STOP: &str = "    ";

/// Truncation limits for rendered items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Lines of a human turn shown before the `… (K more lines)` footer.
    pub human_max_lines: usize,
    /// Lines of a tool result shown before the `… (K more lines)` footer.
    pub result_max_lines: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            human_max_lines: DEFAULT_HUMAN_MAX_LINES,
            result_max_lines: DEFAULT_RESULT_MAX_LINES,
        }
    }
}

/// Turns transcript items into styled terminal lines.
pub struct Renderer {
    options: RenderOptions,
    highlighter: Option<SyntaxHighlighter>,
}

impl Renderer {
    /// Create a renderer; `None` disables syntax highlighting.
    pub fn new(options: RenderOptions, highlighter: Option<SyntaxHighlighter>) -> Self {
        Self {
            options,
            highlighter,
        }
    }

    /// Render `items` for a terminal `columns` wide into one text blob.
    pub fn render(&self, items: &[Item], columns: usize) -> String {
        self.render_lines(items, columns).join("\n")
    }

    /// Render `items` into logical lines.
    pub fn render_lines(&self, items: &[Item], columns: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut prev: Option<ItemKind> = None;
        for item in items {
            self.render_item(item, prev, columns, &mut out);
            prev = Some(item.kind());
        }
        out
    }

    fn render_item(&self, item: &Item, prev: Option<ItemKind>, columns: usize, out: &mut Vec<String>) {
        match item {
            Item::Human { text } => {
                out.push(String::new());
                out.push(format!("{HUMAN_ICON}{BOLD}\u{276f} you{RESET}"));
                self.push_truncated(text, self.options.human_max_lines, "", out, |_| DIM);
            }
            Item::Assistant { text } => {
                out.push(String::new());
                markdown::render_markdown(text, columns, self.highlighter.as_ref(), out);
            }
            Item::ToolUse { name, label } => out.push(render_tool_use(name, label)),
            Item::ToolResult { text, is_error } => {
                let prefix = if prev == Some(ItemKind::ToolUse) {
                    format!("  {CONNECTOR}\u{2502}{RESET} ")
                } else {
                    "  ".to_string()
                };
                let base = if *is_error { TOOL_ERROR } else { TOOL_RESULT };
                let colour_diff = !*is_error && diff::is_diff(text);
                self.push_truncated(text, self.options.result_max_lines, &prefix, out, |line| {
                    if colour_diff {
                        diff::line_style(line, base)
                    } else {
                        base
                    }
                });
            }
        }
    }

    /// Push up to `max` lines of `text`, then a footer counting the rest.
    fn push_truncated<'s>(
        &self,
        text: &str,
        max: usize,
        prefix: &str,
        out: &mut Vec<String>,
        style: impl Fn(&str) -> &'s str,
    ) {
        let lines: Vec<&str> = text.lines().collect();
        for line in lines.iter().take(max) {
            let line = expand_tabs(line);
            let colour = style(&line);
            out.push(format!("{prefix}{colour}{}{RESET}", links::linkify(&line, colour)));
        }
        if lines.len() > max {
            let hidden = lines.len() - max;
            out.push(format!("{prefix}{HEADER_DIM}  {ELLIPSIS} ({hidden} more lines){RESET}"));
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default(), Some(SyntaxHighlighter::default()))
    }
}

fn render_tool_use(name: &str, label: &str) -> String {
    let head = format!("{TOOL_NAME}\u{23fa} {BOLD}{name}{RESET}");
    if label.is_empty() {
        return head;
    }
    let linked = if links::looks_like_path(label) {
        links::osc8_file(label, None)
    } else if links::looks_like_url(label) {
        links::osc8_url(label, None)
    } else {
        label.to_string()
    };
    format!("{head}{TOOL_NAME}({linked}){RESET}")
}

/// Replace tabs with spaces; tabs have no fixed width on a terminal.
pub(crate) fn expand_tabs(s: &str) -> Cow<'_, str> {
    if s.contains('\t') {
        Cow::Owned(s.replace('\t', TAB_STOP))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
