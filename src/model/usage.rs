//! Context-window usage summary.

/// Default context window size in tokens.
pub const DEFAULT_CTX_LIMIT: u64 = 200_000;

/// Context usage derived from the most recent usage record of a transcript.
///
/// A transcript without any usage record has no summary at all
/// (`Option::None`), never a zeroed one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageSummary {
    /// input + cache creation + cache read tokens.
    pub total_tokens: u64,
    /// `total_tokens` as a percentage of the context limit.
    pub pct_of_limit: f64,
}

impl UsageSummary {
    /// Build a summary from the three input token counters.
    ///
    /// A `ctx_limit` of zero is treated as one to keep the percentage finite.
    pub fn from_counts(input: u64, cache_creation: u64, cache_read: u64, ctx_limit: u64) -> Self {
        let total_tokens = input
            .saturating_add(cache_creation)
            .saturating_add(cache_read);
        let pct_of_limit = total_tokens as f64 / ctx_limit.max(1) as f64 * 100.0;
        Self {
            total_tokens,
            pct_of_limit,
        }
    }
}
