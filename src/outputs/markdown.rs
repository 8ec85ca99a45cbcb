//! Markdown rendering of an article set.
//!
//! ```text
//! ## Quick Stats
//!
//! - Total articles: 6 (Last 7 Days)
//! - Technology: 2
//! - Science: 1
//!
//! ## Latest News
//!
//! 1. **RMIT launches AI innovation hub** (Technology, LIVE, TODAY)
//!    RMIT University unveils its new AI and technology initiative.
//!    <https://www.rmit.edu.au/news>
//! ```

use crate::filters::TimeWindow;
use crate::models::{Article, Category};
use crate::prompt::{recency_label, source_label};
use std::fmt::Write;

/// Counts per label over an already time-filtered set.
pub fn quick_stats(articles: &[Article], window: TimeWindow) -> String {
    let count = |c: Category| articles.iter().filter(|a| a.category == c).count();
    let mut md = String::new();
    let _ = writeln!(md, "## Quick Stats\n");
    let _ = writeln!(md, "- Total articles: {} ({window})", articles.len());
    let _ = writeln!(md, "- Technology: {}", count(Category::Technology));
    let _ = writeln!(md, "- Science: {}", count(Category::Science));
    md
}

/// Numbered listing of `articles` under `heading`.
pub fn article_list(heading: &str, articles: &[Article]) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "## {heading}\n");

    if articles.is_empty() {
        let _ = writeln!(md, "_No articles match your current filters._");
        return md;
    }

    for (i, article) in articles.iter().enumerate() {
        let _ = writeln!(
            md,
            "{}. **{}** ({}, {}, {})",
            i + 1,
            article.title,
            article.category,
            source_label(article.source),
            recency_label(article.days_ago)
        );
        let _ = writeln!(md, "   {}", article.summary);
        if article.has_link() {
            let _ = writeln!(md, "   <{}>", article.link);
        }
    }
    md
}
