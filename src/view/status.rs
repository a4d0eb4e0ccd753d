//! Bottom status line: editor banner on the left, context bar on the right.

use crate::model::UsageSummary;
use crate::render::styles::{BANNER, BAR_HIGH, BAR_LOW, BAR_MID, DIM, RESET};
use crate::text::visual_len;

/// Banner shown while the editor is open.
pub const BANNER_TEXT: &str = "  Editor open \u{2014} edit and close to send";
/// Cells in the context bar.
pub const BAR_WIDTH: usize = 12;

const BAR_FULL: char = '\u{2588}';
const BAR_EMPTY: char = '\u{2591}';
const DIVIDER: &str = "  \u{b7}  ";

/// Colour of the context bar for a usage percentage.
pub fn bar_color(pct: f64) -> &'static str {
    if pct < 60.0 {
        BAR_LOW
    } else if pct < 85.0 {
        BAR_MID
    } else {
        BAR_HIGH
    }
}

/// Filled cells for `pct`, clamped to the bar.
fn filled_cells(pct: f64) -> usize {
    let cells = (pct / 100.0 * BAR_WIDTH as f64).round();
    if cells.is_nan() || cells <= 0.0 {
        0
    } else {
        (cells as usize).min(BAR_WIDTH)
    }
}

/// `P%  Tk/Lk`
pub fn context_text(usage: &UsageSummary, ctx_limit: u64) -> String {
    format!(
        "{:.0}%  {:.0}k/{}k",
        usage.pct_of_limit,
        usage.total_tokens as f64 / 1000.0,
        ctx_limit / 1000
    )
}

/// Build the status line for a terminal `columns` wide.
///
/// Without usage only the banner is shown.
pub fn render_status(usage: Option<&UsageSummary>, ctx_limit: u64, columns: usize) -> String {
    let Some(usage) = usage else {
        return format!("{BANNER}{BANNER_TEXT}{RESET}");
    };

    let filled = filled_cells(usage.pct_of_limit);
    let bar: String = std::iter::repeat(BAR_FULL)
        .take(filled)
        .chain(std::iter::repeat(BAR_EMPTY).take(BAR_WIDTH - filled))
        .collect();
    let text = context_text(usage, ctx_limit);

    let used = visual_len(BANNER_TEXT) + visual_len(DIVIDER) + BAR_WIDTH + 1 + visual_len(&text);
    let pad = " ".repeat(columns.saturating_sub(used));
    let color = bar_color(usage.pct_of_limit);

    format!(
        "{BANNER}{BANNER_TEXT}{RESET}{pad}{DIM}{DIVIDER}{RESET}{DIM}{color}{bar}{RESET}{DIM} {text}{RESET}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::strip_escapes;

    fn usage(pct: f64, total: u64) -> UsageSummary {
        UsageSummary {
            total_tokens: total,
            pct_of_limit: pct,
        }
    }

    #[test]
    fn banner_only_without_usage() {
        let line = render_status(None, 200_000, 100);
        assert_eq!(strip_escapes(&line), BANNER_TEXT);
    }

    #[test]
    fn context_text_formats_percent_and_thousands() {
        assert_eq!(context_text(&usage(1.4, 3000), 200_000), "1%  3k/200k");
        assert_eq!(context_text(&usage(50.0, 100_000), 200_000), "50%  100k/200k");
    }

    #[test]
    fn bar_colour_thresholds() {
        assert_eq!(bar_color(0.0), BAR_LOW);
        assert_eq!(bar_color(59.9), BAR_LOW);
        assert_eq!(bar_color(60.0), BAR_MID);
        assert_eq!(bar_color(84.9), BAR_MID);
        assert_eq!(bar_color(85.0), BAR_HIGH);
        assert_eq!(bar_color(140.0), BAR_HIGH);
    }

    #[test]
    fn bar_is_always_twelve_cells() {
        for pct in [0.0, 4.0, 50.0, 100.0, 250.0, -3.0] {
            let line = render_status(Some(&usage(pct, 1000)), 200_000, 100);
            let plain = strip_escapes(&line);
            let cells = plain
                .chars()
                .filter(|&c| c == BAR_FULL || c == BAR_EMPTY)
                .count();
            assert_eq!(cells, BAR_WIDTH, "pct {pct}");
        }
    }

    #[test]
    fn half_full_bar_fills_six_cells() {
        let line = render_status(Some(&usage(50.0, 100_000)), 200_000, 100);
        let filled = strip_escapes(&line).chars().filter(|&c| c == BAR_FULL).count();
        assert_eq!(filled, 6);
    }

    #[test]
    fn status_fills_the_terminal_width() {
        let line = render_status(Some(&usage(10.0, 20_000)), 200_000, 100);
        assert_eq!(visual_len(&line), 100);
    }

    #[test]
    fn narrow_terminal_gets_no_padding() {
        let line = render_status(Some(&usage(10.0, 20_000)), 200_000, 10);
        assert!(visual_len(&line) > 10);
        assert!(strip_escapes(&line).contains("10%  20k/200k"));
    }
}
