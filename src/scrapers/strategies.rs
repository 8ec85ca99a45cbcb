//! Node-discovery strategies and the runner that merges them.
//!
//! A listing page's markup changes whenever the site's CMS theme does, so no
//! single selector can be trusted. Each [`Strategy`] finds candidate nodes
//! its own way and hands them to the [`Extractor`]. The runner tries them
//! in priority order, merges by link, and stops as soon as it has enough.
//!
//! | Priority | Strategy | Finds |
//! |----------|----------|-------|
//! | 1 | [`ContainerScan`] | `div`s classed like `news`, `card`, `item` |
//! | 2 | [`CardSelectors`] | first matching well-known card selector |
//! | 3 | [`ArticleTags`] | `<article>` elements |
//! | 4 | [`NewsLinks`] | bare anchors pointing under `/news/` |

use crate::error::{NewsError, Result};
use crate::models::Article;
use crate::scrapers::extract::Extractor;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Stop trying further strategies once this many records are collected.
pub const SUFFICIENT_RESULTS: usize = 8;
/// Upper bound on records returned for one page.
pub const MAX_PAGE_RESULTS: usize = 15;

/// One heuristic for locating article nodes on a page.
pub trait Strategy {
    fn name(&self) -> &'static str;

    fn discover(&self, page: &Html, extractor: &Extractor, category_slug: &str) -> Result<Vec<Article>>;
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| NewsError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

static CONTAINER_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)news|card|item").unwrap());

/// Generic scan over `div`s whose class loosely looks like a news card.
#[derive(Debug, Default)]
pub struct ContainerScan;

impl ContainerScan {
    const LIMIT: usize = 12;
}

impl Strategy for ContainerScan {
    fn name(&self) -> &'static str {
        "container_scan"
    }

    fn discover(&self, page: &Html, extractor: &Extractor, category_slug: &str) -> Result<Vec<Article>> {
        let divs = parse_selector("div[class]")?;
        Ok(page
            .select(&divs)
            .filter(|el| {
                el.value()
                    .attr("class")
                    .is_some_and(|c| CONTAINER_CLASS.is_match(c))
            })
            .take(Self::LIMIT)
            .filter_map(|el| extractor.extract(el, category_slug))
            .collect())
    }
}

/// Well-known card markup conventions. Only the first selector that
/// produces any records is used.
#[derive(Debug)]
pub struct CardSelectors {
    selectors: Vec<String>,
}

impl CardSelectors {
    const LIMIT: usize = 8;

    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selectors: selectors.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self::new([
            r#"[data-component="card"]"#,
            ".card",
            ".news-card",
            ".news-item",
            ".listing-item",
        ])
    }
}

impl Strategy for CardSelectors {
    fn name(&self) -> &'static str {
        "card_selectors"
    }

    fn discover(&self, page: &Html, extractor: &Extractor, category_slug: &str) -> Result<Vec<Article>> {
        for css in &self.selectors {
            let selector = parse_selector(css)?;
            let found: Vec<Article> = page
                .select(&selector)
                .take(Self::LIMIT)
                .filter_map(|el| extractor.extract(el, category_slug))
                .collect();
            if !found.is_empty() {
                debug!(selector = %css, count = found.len(), "Card selector matched");
                return Ok(found);
            }
        }
        Ok(Vec::new())
    }
}

/// Semantic `<article>` elements.
#[derive(Debug, Default)]
pub struct ArticleTags;

impl Strategy for ArticleTags {
    fn name(&self) -> &'static str {
        "article_tags"
    }

    fn discover(&self, page: &Html, extractor: &Extractor, category_slug: &str) -> Result<Vec<Article>> {
        let articles = parse_selector("article")?;
        Ok(page
            .select(&articles)
            .take(8)
            .filter_map(|el| extractor.extract(el, category_slug))
            .collect())
    }
}

/// Last resort: any anchor whose href contains `/news/`.
#[derive(Debug)]
pub struct NewsLinks {
    limit: usize,
}

impl NewsLinks {
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for NewsLinks {
    fn default() -> Self {
        Self::with_limit(12)
    }
}

impl Strategy for NewsLinks {
    fn name(&self) -> &'static str {
        "news_links"
    }

    fn discover(&self, page: &Html, extractor: &Extractor, category_slug: &str) -> Result<Vec<Article>> {
        let links = parse_selector(r#"a[href*="/news/"]"#)?;
        Ok(page
            .select(&links)
            .take(self.limit)
            .filter_map(|el| extractor.extract_link(el, category_slug))
            .collect())
    }
}

/// The default strategy list, highest priority first.
pub fn default_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(ContainerScan),
        Box::new(CardSelectors::default()),
        Box::new(ArticleTags),
        Box::new(NewsLinks::default()),
    ]
}

/// Applies strategies in order and merges their output.
pub struct StrategyRunner {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Default for StrategyRunner {
    fn default() -> Self {
        Self::new(default_strategies())
    }
}

impl StrategyRunner {
    pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Deduplicated, order-preserving records for one page.
    ///
    /// Records are merged by case-insensitive link; a failing strategy is
    /// logged and skipped. Lower-priority strategies are not run once
    /// [`SUFFICIENT_RESULTS`] records are in hand.
    #[instrument(level = "info", skip_all, fields(category = %category_slug))]
    pub fn run(&self, page: &Html, extractor: &Extractor, category_slug: &str) -> Vec<Article> {
        let mut merged: Vec<Article> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for strategy in &self.strategies {
            let found = match strategy.discover(page, extractor, category_slug) {
                Ok(found) => found,
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "Strategy failed; skipping");
                    continue;
                }
            };

            let before = merged.len();
            for article in found {
                if seen.insert(article.link_key()) {
                    merged.push(article);
                }
            }
            debug!(
                strategy = strategy.name(),
                added = merged.len() - before,
                total = merged.len(),
                "Strategy finished"
            );

            if merged.len() >= SUFFICIENT_RESULTS {
                break;
            }
        }

        merged.truncate(MAX_PAGE_RESULTS);
        merged
    }
}
