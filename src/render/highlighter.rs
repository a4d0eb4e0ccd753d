//! Syntax highlighting of fenced code blocks using syntect + two-face.
//!
//! Highlighted lines are emitted as 24-bit ANSI foreground spans; the caller
//! supplies the code background and padding.
//!
//! # Theme Support
//!
//! Any name in [`VALID_THEMES`] may be configured, e.g. `monokai` (default),
//! `gruvbox-dark`, `dracula`, `nord`, `solarized-dark`.

use std::fmt::Write as _;
use std::sync::LazyLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use two_face::theme::{EmbeddedLazyThemeSet, EmbeddedThemeName};

/// All valid theme names that can be used in configuration.
pub const VALID_THEMES: &[&str] = &[
    "base16-eighties-dark",
    "base16-mocha-dark",
    "base16-ocean-dark",
    "coldark-dark",
    "dark-neon",
    "dracula",
    "gruvbox-dark",
    "monokai",
    "monokai-bright",
    "monokai-origin",
    "nord",
    "one-half-dark",
    "solarized-dark",
    "sublime-snazzy",
    "two-dark",
    "zenburn",
];

/// Default theme name.
pub const DEFAULT_THEME: &str = "monokai";

static THEME_SET: LazyLock<EmbeddedLazyThemeSet> = LazyLock::new(two_face::theme::extra);
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(two_face::syntax::extra_newlines);

/// Only dark themes are offered: code blocks sit on a dark background.
fn theme_name_to_embedded(name: &str) -> Option<EmbeddedThemeName> {
    match name {
        "base16-eighties-dark" => Some(EmbeddedThemeName::Base16EightiesDark),
        "base16-mocha-dark" => Some(EmbeddedThemeName::Base16MochaDark),
        "base16-ocean-dark" => Some(EmbeddedThemeName::Base16OceanDark),
        "coldark-dark" => Some(EmbeddedThemeName::ColdarkDark),
        "dark-neon" => Some(EmbeddedThemeName::DarkNeon),
        "dracula" => Some(EmbeddedThemeName::Dracula),
        "gruvbox-dark" => Some(EmbeddedThemeName::GruvboxDark),
        "monokai" | "monokai-extended" => Some(EmbeddedThemeName::MonokaiExtended),
        "monokai-bright" => Some(EmbeddedThemeName::MonokaiExtendedBright),
        "monokai-origin" => Some(EmbeddedThemeName::MonokaiExtendedOrigin),
        "nord" => Some(EmbeddedThemeName::Nord),
        "one-half-dark" => Some(EmbeddedThemeName::OneHalfDark),
        "solarized-dark" => Some(EmbeddedThemeName::SolarizedDark),
        "sublime-snazzy" => Some(EmbeddedThemeName::SublimeSnazzy),
        "two-dark" => Some(EmbeddedThemeName::TwoDark),
        "zenburn" => Some(EmbeddedThemeName::Zenburn),
        _ => None,
    }
}

/// Check if a theme name is valid.
pub fn is_valid_theme(name: &str) -> bool {
    theme_name_to_embedded(name).is_some()
}

/// Syntax highlighter bound to one theme.
pub struct SyntaxHighlighter {
    theme_name: EmbeddedThemeName,
}

impl SyntaxHighlighter {
    /// Create a highlighter; unknown theme names fall back to [`DEFAULT_THEME`].
    pub fn new(theme_name: &str) -> Self {
        let theme_name = theme_name_to_embedded(theme_name).unwrap_or_else(|| {
            tracing::warn!(theme = theme_name, "Unknown theme, using {DEFAULT_THEME}");
            EmbeddedThemeName::MonokaiExtended
        });
        Self { theme_name }
    }

    /// Highlight `code` as `language`.
    ///
    /// Returns one ANSI-coloured string per source line, or `None` when the
    /// language is missing or unknown, or highlighting fails; the caller then
    /// falls back to flat colouring.
    pub fn highlight_code(&self, code: &str, language: Option<&str>) -> Option<Vec<String>> {
        let syntax = SYNTAX_SET.find_syntax_by_token(language?)?;
        let theme = THEME_SET.get(self.theme_name);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let ranges = match highlighter.highlight_line(line, &SYNTAX_SET) {
                Ok(ranges) => ranges,
                Err(e) => {
                    tracing::debug!(error = %e, "Highlighting failed, using flat code colour");
                    return None;
                }
            };
            let mut out = String::new();
            for (style, text) in ranges {
                let text = text.trim_end_matches(['\n', '\r']);
                if !text.is_empty() {
                    push_styled(&mut out, style, text);
                }
            }
            lines.push(out);
        }
        Some(lines)
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

/// Append `text` with the syntect style as SGR foreground + attributes.
///
/// Attributes are switched off explicitly so the caller's background stays.
fn push_styled(out: &mut String, style: Style, text: &str) {
    let fg = style.foreground;
    let _ = write!(out, "\x1b[22;23;24;38;2;{};{};{}m", fg.r, fg.g, fg.b);
    if style.font_style.contains(FontStyle::BOLD) {
        out.push_str("\x1b[1m");
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out.push_str("\x1b[3m");
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out.push_str("\x1b[4m");
    }
    out.push_str(text);
}
