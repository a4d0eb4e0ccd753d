//! Pure core integration functions.
//!
//! Parse → render → wrap, producing the visual rows the pager holds. These
//! functions do no terminal I/O and are shared by the render loop, the
//! integration tests and the benchmark.

use crate::model::{InputError, Transcript};
use crate::render::styles::{HEADER_DIM, RESET, RULE};
use crate::render::Renderer;
use crate::source::TranscriptSource;
use crate::text::wrap_lines;

/// Blank rows appended after the end-of-transcript rule.
pub const BOTTOM_PADDING: usize = 2;

/// The dim rule marking the end of the transcript.
pub fn end_of_transcript_rule() -> String {
    let rule: String = std::iter::repeat(RULE).take(3).collect();
    format!("{HEADER_DIM}  {rule} end of transcript {rule}{RESET}")
}

/// Render `transcript` and wrap it to `columns`.
///
/// The logical lines are followed by the end-of-transcript rule and
/// [`BOTTOM_PADDING`] blank rows before wrapping.
pub fn build_rows(transcript: &Transcript, renderer: &Renderer, columns: usize) -> Vec<String> {
    let mut logical = renderer.render_lines(&transcript.items, columns);
    logical.push(end_of_transcript_rule());
    logical.extend(std::iter::repeat_with(String::new).take(BOTTOM_PADDING));
    wrap_lines(&logical, columns)
}

/// Parse the source and build its rows in one step.
///
/// Returns the transcript alongside the rows so the caller keeps the usage
/// summary for the status line.
///
/// # Errors
///
/// Returns `InputError` if the transcript cannot be read.
pub fn load_rows(
    source: &TranscriptSource,
    renderer: &Renderer,
    ctx_limit: u64,
    columns: usize,
) -> Result<(Transcript, Vec<String>), InputError> {
    let started = std::time::Instant::now();
    let transcript = source.load(ctx_limit)?;
    let rows = build_rows(&transcript, renderer, columns);
    tracing::debug!(
        items = transcript.items.len(),
        rows = rows.len(),
        columns,
        elapsed_us = started.elapsed().as_micros() as u64,
        "Transcript rebuilt"
    );
    Ok((transcript, rows))
}
