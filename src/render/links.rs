//! OSC-8 hyperlinks and auto-linking of URLs and file paths.
//!
//! OSC-8 links are non-intercepting: the terminal keeps handling clicks and
//! selection itself, the link only adds a target to the visible label.

use super::styles::{ELLIPSIS, LINK_URL, RESET, UNDERLINE_OFF, UNDERLINE_ON};
use std::fmt::Write as _;

const URL_LABEL_MAX: usize = 60;
const PATH_LABEL_MAX: usize = 50;
const MIN_URL_LEN: usize = 11;

/// Wrap `label` in an OSC-8 hyperlink to `target`.
pub fn osc8(target: &str, label: &str) -> String {
    format!("\x1b]8;;{target}\x07{label}\x1b]8;;\x07")
}

/// Hyperlink to a local file; the label defaults to the path itself.
pub fn osc8_file(path: &str, label: Option<&str>) -> String {
    osc8(&format!("file://{}", percent_encode_path(path)), label.unwrap_or(path))
}

/// Hyperlink to a URL; the label defaults to the URL itself.
pub fn osc8_url(url: &str, label: Option<&str>) -> String {
    osc8(url, label.unwrap_or(url))
}

/// Percent-encode every byte outside `A-Za-z0-9-._~/:@`.
pub fn percent_encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~/:@".contains(&byte) {
            out.push(byte as char);
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

/// True when a label should be linked as a file.
pub fn looks_like_path(s: &str) -> bool {
    s.starts_with('/')
}

/// True when a label should be linked as a URL.
pub fn looks_like_url(s: &str) -> bool {
    s.starts_with("http")
}

/// Shorten a URL for display: drop the scheme, keep the domain, elide the
/// middle of the path.
pub fn shorten_url(url: &str) -> String {
    let display = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let chars: Vec<char> = display.chars().collect();
    if chars.len() <= URL_LABEL_MAX {
        return display.to_string();
    }

    let truncated = || {
        let mut s: String = chars[..URL_LABEL_MAX - 1].iter().collect();
        s.push(ELLIPSIS);
        s
    };

    let Some(slash) = chars.iter().position(|&c| c == '/') else {
        return truncated();
    };

    let domain_len = slash + 1;
    // One column is reserved for the ellipsis.
    let Some(avail) = URL_LABEL_MAX.checked_sub(domain_len + 1).filter(|&a| a >= 8) else {
        return truncated();
    };

    let path = &chars[domain_len..];
    let tail = (avail / 3).min(20).min(path.len());
    let head = (avail - tail).min(path.len());

    let mut out: String = chars[..domain_len].iter().collect();
    out.extend(&path[..head]);
    out.push(ELLIPSIS);
    if tail > 0 && path.len() > tail {
        out.extend(&path[path.len() - tail..]);
    }
    out
}

/// Shorten a file path for display as `…/parent/file` or `…/file`.
pub fn shorten_path(path: &str) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= PATH_LABEL_MAX {
        return path.to_string();
    }

    let Some(last) = chars.iter().rposition(|&c| c == '/') else {
        let head: String = chars.iter().take(PATH_LABEL_MAX - 2).collect();
        return format!("{ELLIPSIS}/{head}");
    };

    if let Some(prev) = chars[..last].iter().rposition(|&c| c == '/') {
        if chars.len() - prev < PATH_LABEL_MAX {
            let tail: String = chars[prev..].iter().collect();
            return format!("{ELLIPSIS}{tail}");
        }
    }

    if chars.len() - last < PATH_LABEL_MAX {
        let tail: String = chars[last..].iter().collect();
        return format!("{ELLIPSIS}{tail}");
    }

    let file: String = chars[last + 1..].iter().take(PATH_LABEL_MAX - 2).collect();
    format!("{ELLIPSIS}/{file}")
}

fn is_url_char(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '<' | '>' | '"' | '\'' | '\\' | ')' | '}' | ']')
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '/')
}

/// Auto-link bare URLs and absolute or home-relative paths in plain text.
///
/// `resume` is the style re-applied after each link so the surrounding text
/// keeps its colour. The input must be escape-free.
pub fn linkify(text: &str, resume: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        if rest.starts_with("http://") || rest.starts_with("https://") {
            let end = rest.find(|c: char| !is_url_char(c)).unwrap_or(rest.len());
            let url = rest[..end].trim_end_matches(['.', ',', ';', ':']);
            if url.chars().count() >= MIN_URL_LEN {
                let label = format!("{LINK_URL}{UNDERLINE_ON}{}{UNDERLINE_OFF}", shorten_url(url));
                out.push_str(&osc8_url(url, Some(&label)));
                out.push_str(RESET);
                out.push_str(resume);
            } else {
                out.push_str(url);
            }
            prev = url.chars().last();
            rest = &rest[url.len()..];
            continue;
        }

        if let Some(len) = path_at(rest, prev) {
            let path = &rest[..len];
            let target = match path.strip_prefix('~') {
                Some(home_relative) => dirs::home_dir()
                    .map(|home| format!("{}{home_relative}", home.display()))
                    .unwrap_or_else(|| path.to_string()),
                None => path.to_string(),
            };
            let label = format!("{UNDERLINE_ON}{}{UNDERLINE_OFF}", shorten_path(path));
            out.push_str(&osc8_file(&target, Some(&label)));
            prev = path.chars().last();
            rest = &rest[len..];
            continue;
        }

        out.push(c);
        prev = Some(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Byte length of a linkable path starting at `s`, if any.
fn path_at(s: &str, prev: Option<char>) -> Option<usize> {
    if prev.is_some_and(|p| is_path_char(p) || p == ':' || p == '~') {
        return None;
    }

    let (tilde, body) = match s.strip_prefix("~/") {
        Some(body) => (true, body),
        None => (false, s.strip_prefix('/')?),
    };
    if !body.starts_with(is_path_char) || body.starts_with('/') {
        return None;
    }

    let prefix_len = if tilde { 2 } else { 1 };
    let body_len = body.find(|c: char| !is_path_char(c)).unwrap_or(body.len());
    let body = body[..body_len].trim_end_matches(['.', ',']);

    if !tilde && !body.contains('/') {
        return None;
    }
    let total = prefix_len + body.len();
    (total >= 3).then_some(total)
}
