//! Tests for the item renderer.

use super::styles::{DIFF_ADD, DIFF_REMOVE, TOOL_ERROR, TOOL_RESULT};
use super::*;
use crate::text::strip_escapes;

fn plain_renderer() -> Renderer {
    Renderer::new(RenderOptions::default(), None)
}

fn plain_lines(items: &[Item]) -> Vec<String> {
    plain_renderer()
        .render_lines(items, 80)
        .iter()
        .map(|l| strip_escapes(l).into_owned())
        .collect()
}

// ===== Human turns =====

#[test]
fn human_turn_has_marker_and_dimmed_body() {
    let lines = plain_renderer().render_lines(&[Item::human("hello")], 80);
    assert_eq!(lines[0], "");
    assert_eq!(strip_escapes(&lines[1]), "\u{276f} you");
    assert_eq!(lines[2], format!("{DIM}hello{RESET}"));
}

#[test]
fn long_human_turn_is_truncated_with_footer() {
    let text = (1..=25).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
    let lines = plain_lines(&[Item::human(text)]);
    // blank + marker + 20 body lines + footer
    assert_eq!(lines.len(), 23);
    assert_eq!(lines[21], "line 20");
    assert_eq!(lines[22], "  \u{2026} (5 more lines)");
}

#[test]
fn human_limit_is_configurable() {
    let renderer = Renderer::new(
        RenderOptions {
            human_max_lines: 2,
            ..RenderOptions::default()
        },
        None,
    );
    let lines = renderer.render_lines(&[Item::human("a\nb\nc")], 80);
    assert_eq!(strip_escapes(lines.last().unwrap()), "  \u{2026} (1 more lines)");
}

// ===== Assistant text =====

#[test]
fn assistant_text_is_preceded_by_blank_line() {
    let lines = plain_lines(&[Item::assistant("Hi there")]);
    assert_eq!(lines, vec!["", "Hi there"]);
}

// ===== Tool use =====

#[test]
fn tool_use_shows_name_and_label() {
    let lines = plain_lines(&[Item::tool_use("Bash", "ls -la")]);
    assert_eq!(lines, vec!["\u{23fa} Bash(ls -la)"]);
}

#[test]
fn tool_use_without_label_has_no_parentheses() {
    let lines = plain_lines(&[Item::tool_use("TodoWrite", "")]);
    assert_eq!(lines, vec!["\u{23fa} TodoWrite"]);
}

#[test]
fn tool_use_path_label_is_hyperlinked() {
    let lines = plain_renderer().render_lines(&[Item::tool_use("Read", "/tmp/test.py")], 80);
    assert!(lines[0].contains("\x1b]8;;file:///tmp/test.py\x07/tmp/test.py\x1b]8;;\x07"));
}

#[test]
fn tool_use_url_label_is_hyperlinked() {
    let lines = plain_renderer().render_lines(&[Item::tool_use("WebFetch", "https://docs.rs")], 80);
    assert!(lines[0].contains("\x1b]8;;https://docs.rs\x07"));
}

// ===== Tool results =====

#[test]
fn result_after_tool_use_gets_connector() {
    let lines = plain_lines(&[Item::tool_use("Read", "/tmp/a"), Item::tool_result("ok", false)]);
    assert_eq!(lines[1], "  \u{2502} ok");
}

#[test]
fn result_without_tool_use_is_only_indented() {
    let lines = plain_lines(&[Item::assistant("x"), Item::tool_result("ok", false)]);
    assert_eq!(lines.last().unwrap(), "  ok");
}

#[test]
fn long_result_is_truncated_to_six_lines() {
    let text = (1..=10).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
    let lines = plain_lines(&[Item::tool_result(text, false)]);
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[6], "    \u{2026} (4 more lines)");
}

#[test]
fn error_result_uses_error_colour() {
    let lines = plain_renderer().render_lines(&[Item::tool_result("boom", true)], 80);
    assert!(lines[0].contains(TOOL_ERROR));
    assert!(!lines[0].contains(TOOL_RESULT));
}

#[test]
fn diff_result_colours_adds_and_removes() {
    let lines = plain_renderer().render_lines(&[Item::tool_result("@@ -1 +1 @@\n-old\n+new", false)], 80);
    assert!(lines[1].contains(DIFF_REMOVE));
    assert!(lines[2].contains(DIFF_ADD));
}

#[test]
fn non_diff_result_keeps_base_colour() {
    let lines = plain_renderer().render_lines(&[Item::tool_result("+only additions", false)], 80);
    assert!(lines[0].contains(TOOL_RESULT));
    assert!(!lines[0].contains(DIFF_ADD));
}

#[test]
fn tabs_are_expanded() {
    let lines = plain_lines(&[Item::tool_result("a\tb", false)]);
    assert_eq!(lines[0], "  a    b");
}

// ===== Whole transcript =====

#[test]
fn render_joins_lines_with_newlines() {
    let items = [Item::human("q"), Item::assistant("a")];
    let blob = plain_renderer().render(&items, 80);
    assert_eq!(blob.lines().count(), plain_renderer().render_lines(&items, 80).len());
}

#[test]
fn every_line_ends_reset_or_empty() {
    let items = [
        Item::human("q"),
        Item::assistant("# Title\n- item\n```rust\nfn x() {}\n```"),
        Item::tool_use("Bash", "ls"),
        Item::tool_result("out", false),
    ];
    for line in Renderer::default().render_lines(&items, 80) {
        assert!(line.is_empty() || line.ends_with(RESET), "unterminated line: {line:?}");
    }
}
