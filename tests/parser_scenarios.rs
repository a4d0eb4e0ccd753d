//! Integration tests: transcript fixtures through the parser.

use claude_pager::model::{InputError, Item, DEFAULT_CTX_LIMIT};
use claude_pager::parser::parse_transcript;
use claude_pager::text::contains_escapes;
use std::path::Path;

const SAMPLE_FIXTURE: &str = "tests/fixtures/sample.jsonl";
const HOSTILE_FIXTURE: &str = "tests/fixtures/hostile.jsonl";

fn item_text(item: &Item) -> &str {
    match item {
        Item::Human { text } | Item::Assistant { text } | Item::ToolResult { text, .. } => text,
        Item::ToolUse { label, .. } => label,
    }
}

// ===== Sample session =====

#[test]
fn sample_session_yields_items_in_file_order() {
    // GIVEN a user turn, an assistant turn with usage, a Read call and its result
    let transcript = parse_transcript(Path::new(SAMPLE_FIXTURE), DEFAULT_CTX_LIMIT)
        .expect("fixture should load");

    // THEN exactly four items come back in file order
    assert_eq!(
        transcript.items,
        vec![
            Item::human("Please look at test.py"),
            Item::assistant("Let me read it."),
            Item::tool_use("Read", "/tmp/test.py"),
            Item::tool_result("print('hello')", false),
        ]
    );
}

#[test]
fn sample_session_usage_totals_input_side_tokens() {
    let transcript = parse_transcript(Path::new(SAMPLE_FIXTURE), DEFAULT_CTX_LIMIT).unwrap();

    let usage = transcript.usage.expect("usage record present");
    assert_eq!(usage.total_tokens, 3000);
    assert!((usage.pct_of_limit - 1.5).abs() < 1e-9);
}

#[test]
fn context_limit_scales_percentage() {
    let transcript = parse_transcript(Path::new(SAMPLE_FIXTURE), 1_000_000).unwrap();
    let usage = transcript.usage.unwrap();
    assert!((usage.pct_of_limit - 0.3).abs() < 1e-9);
}

// ===== Hostile input =====

#[test]
fn hostile_transcript_is_fully_sanitized() {
    let transcript = parse_transcript(Path::new(HOSTILE_FIXTURE), DEFAULT_CTX_LIMIT).unwrap();

    for item in &transcript.items {
        let text = item_text(item);
        assert!(!contains_escapes(text), "escape survived in {item:?}");
        assert!(!text.contains('\x1b'), "ESC byte survived in {item:?}");
        assert!(!text.contains('\x07'), "BEL byte survived in {item:?}");
    }
}

#[test]
fn embedded_hyperlinks_lose_their_target() {
    let transcript = parse_transcript(Path::new(HOSTILE_FIXTURE), DEFAULT_CTX_LIMIT).unwrap();

    let assistant = transcript
        .items
        .iter()
        .find(|i| matches!(i, Item::Assistant { .. }))
        .expect("assistant item");
    assert_eq!(item_text(assistant), "red and click done");
}

#[test]
fn directives_and_garbage_are_dropped() {
    // GIVEN two directive turns, a non-JSON line and an unknown record type
    let transcript = parse_transcript(Path::new(HOSTILE_FIXTURE), DEFAULT_CTX_LIMIT).unwrap();

    // THEN only the real content survives, and the pass did not abort
    let humans: Vec<&str> = transcript
        .items
        .iter()
        .filter(|i| matches!(i, Item::Human { .. }))
        .map(item_text)
        .collect();
    assert_eq!(humans, vec!["real question"]);
    assert_eq!(transcript.items.len(), 4);
    assert_eq!(transcript.usage, None);
}

#[test]
fn error_results_keep_their_flag() {
    let transcript = parse_transcript(Path::new(HOSTILE_FIXTURE), DEFAULT_CTX_LIMIT).unwrap();
    assert!(transcript
        .items
        .contains(&Item::tool_result("boom", true)));
}

// ===== Missing input =====

#[test]
fn missing_transcript_is_reported() {
    let result = parse_transcript(Path::new("tests/fixtures/does_not_exist.jsonl"), DEFAULT_CTX_LIMIT);
    assert!(matches!(result, Err(InputError::FileNotFound { .. })));
}
