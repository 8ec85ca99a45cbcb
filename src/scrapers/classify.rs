//! Keyword category classifier.
//!
//! Content wins over context: an article about AI that happens to sit on
//! the science listing is still labeled Technology. Only when neither
//! keyword set matches does the slug of the listing page decide.

use crate::models::Category;
use once_cell::sync::Lazy;
use regex::Regex;

const TECH_KEYWORDS: &[&str] = &[
    "ai",
    "computer",
    "computing",
    "software",
    "tech",
    "cyber",
    "data",
    "digital",
    "programming",
    "algorithm",
    "machine learning",
    "robot",
    "engineering",
];

const SCIENCE_KEYWORDS: &[&str] = &[
    "science",
    "scientist",
    "research",
    "lab",
    "study",
    "studies",
    "physics",
    "chemistry",
    "biology",
    "astronomy",
    "environment",
    "publication",
    "experiment",
];

/// Keywords too short to match inside other words (`said`, `campaign`).
const WHOLE_WORD_KEYWORDS: &[&str] = &["ai"];

/// Alternation over a keyword list. Keywords match anywhere in a word
/// (`biotech`, `cyberattack`, `researcher`) except the short ones in
/// [`WHOLE_WORD_KEYWORDS`], which need word boundaries on both sides.
fn keyword_regex(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| {
            if WHOLE_WORD_KEYWORDS.contains(w) {
                format!(r"\b{}\b", regex::escape(w))
            } else {
                regex::escape(w)
            }
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).unwrap()
}

static TECH: Lazy<Regex> = Lazy::new(|| keyword_regex(TECH_KEYWORDS));
static SCIENCE: Lazy<Regex> = Lazy::new(|| keyword_regex(SCIENCE_KEYWORDS));

/// Pick exactly one label for an article.
pub fn classify(title: &str, summary: &str, requested_slug: &str) -> Category {
    let text = format!("{title} {summary}").to_lowercase();
    if TECH.is_match(&text) {
        Category::Technology
    } else if SCIENCE.is_match(&text) {
        Category::Science
    } else {
        Category::from_slug(requested_slug)
    }
}
