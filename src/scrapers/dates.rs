//! Date normalization.
//!
//! Listing pages print dates in whatever shape the CMS template chose. This
//! module turns that text into a whole-day count relative to "today".
//!
//! Formats are tried in a fixed order and the first full parse wins, so an
//! ambiguous `03/04/2025` is read day-first (3 April). That is deliberate
//! and covered by a test; do not add locale guessing here.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// Accepted formats, in priority order.
pub const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,2})(st|nd|rd|th)").unwrap());

static EMBEDDED_ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap());

/// Strip ordinals (`5th` -> `5`) and normalize non-breaking spaces and dash
/// variants.
pub fn normalize_date_text(raw: &str) -> String {
    let s = ORDINAL_SUFFIX.replace_all(raw.trim(), "${1}");
    s.replace('\u{a0}', " ")
        .replace(['\u{2013}', '\u{2014}'], "-")
        .trim()
        .to_string()
}

/// Parse free-form date text into a calendar date, if any known shape fits.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = normalize_date_text(raw);
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&s, fmt).ok())
        .or_else(|| {
            EMBEDDED_ISO
                .captures(&s)
                .and_then(|c| NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok())
        })
}

/// Whole days between the date found in `text` and `today`.
///
/// Returns 0 when the text is absent, unparsable, or names a future date.
pub fn days_since(text: Option<&str>, today: NaiveDate) -> u32 {
    let Some(date) = text.and_then(parse_date) else {
        return 0;
    };
    let days = (today - date).num_days().max(0);
    trace!(%date, days, "Normalized date");
    u32::try_from(days).unwrap_or(u32::MAX)
}
