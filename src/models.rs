//! Data models for scraped news articles and the persisted cache document.
//!
//! - [`Article`]: one structured news record, the only domain entity
//! - [`Category`]: the fixed display label set
//! - [`Source`]: provenance tag (live-fetched vs. built-in demo content)
//! - [`CacheDocument`]: the JSON document written by the cache store
//!
//! Records are built once per fetch and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when an article has no usable link.
pub const PLACEHOLDER_LINK: &str = "#";

/// The fixed set of category labels shown to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Category {
    #[serde(rename = "All News")]
    AllNews,
    Technology,
    Science,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::AllNews, Category::Technology, Category::Science];

    /// Display label, e.g. `"All News"`.
    pub fn label(&self) -> &'static str {
        match self {
            Category::AllNews => "All News",
            Category::Technology => "Technology",
            Category::Science => "Science",
        }
    }

    /// Map a fetch-category slug (`all_news`, `technology`, `science`) to its
    /// label. Unrecognized slugs map to [`Category::AllNews`].
    pub fn from_slug(slug: &str) -> Self {
        match slug.trim().to_lowercase().as_str() {
            "technology" => Category::Technology,
            "science" => Category::Science,
            _ => Category::AllNews,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a record came from. Readers are shown the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Scraped from the university website.
    Live,
    /// Built-in placeholder content used when nothing live is available.
    Demo,
}

/// A structured news article recovered from a listing page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// Headline, whitespace-collapsed, at least ten characters.
    pub title: String,
    /// Absolute URL, or [`PLACEHOLDER_LINK`].
    pub link: String,
    /// Collapsed, length-capped description text.
    pub summary: String,
    /// Display timestamp derived from `days_ago` at fetch time.
    pub published: String,
    /// Whole days between publication and fetch; 0 when unknown.
    pub days_ago: u32,
    pub category: Category,
    pub source: Source,
}

impl Article {
    /// Deduplication key: trimmed, lowercased link.
    pub fn link_key(&self) -> String {
        self.link.trim().to_lowercase()
    }

    /// Whether the article points at a real page.
    pub fn has_link(&self) -> bool {
        self.link != PLACEHOLDER_LINK
    }
}

/// On-disk layout of the article cache.
#[derive(Debug, Deserialize, Serialize)]
pub struct CacheDocument {
    pub articles: Vec<Article>,
    /// Fetch timestamp, RFC 3339.
    pub last_updated: DateTime<Utc>,
    /// Name of the producer that wrote the document.
    pub source: String,
    pub total_articles: usize,
}
