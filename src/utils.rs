//! Text and link helpers shared by the extractor, renderer and prompt builder.
//!
//! - Whitespace collapsing and character-safe truncation
//! - Link resolution against the site origin
//! - Log-friendly previews of long strings

use crate::models::PLACEHOLDER_LINK;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every run of whitespace (including non-breaking spaces) into a
/// single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Cut `s` to at most `max` characters, ending with `"..."` when cut.
///
/// The result never exceeds `max` characters. Counting is by `char`, so
/// multi-byte text is never split mid-codepoint.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_with_ellipsis("short", 200), "short");
/// assert_eq!(truncate_with_ellipsis("abcdefghij", 8), "abcde...");
/// ```
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Take the first `max` characters of `s` and append `"..."` if anything was
/// dropped. Unlike [`truncate_with_ellipsis`] the marker is added on top.
pub fn cut_then_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push_str("...");
    out
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backed off to a char boundary)
/// with an ellipsis and a byte count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Resolve an `href` found on a page into an absolute http(s) URL.
///
/// Root-relative and document-relative paths are joined onto `base`.
/// Empty hrefs, bare fragments and non-http schemes (`mailto:`,
/// `javascript:`) resolve to [`PLACEHOLDER_LINK`].
pub fn resolve_link(base: &Url, href: Option<&str>) -> String {
    let Some(href) = href.map(str::trim).filter(|h| !h.is_empty()) else {
        return PLACEHOLDER_LINK.to_string();
    };
    if href.starts_with('#') {
        return PLACEHOLDER_LINK.to_string();
    }
    match base.join(href) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.to_string(),
        _ => PLACEHOLDER_LINK.to_string(),
    }
}
