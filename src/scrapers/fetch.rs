//! Fetch orchestration across category listing pages.
//!
//! Categories are fetched one at a time with a pause in between; the site is
//! a university web server, not a CDN, and is treated politely. A category
//! that fails is logged and skipped. If every category fails the result is
//! simply empty and the caller falls back to cached or demo content.

use crate::config::{CategoryFeed, ScraperConfig};
use crate::error::Result;
use crate::http::PageFetcher;
use crate::models::Article;
use crate::scrapers::extract::Extractor;
use crate::scrapers::strategies::{NewsLinks, Strategy, StrategyRunner};
use chrono::{FixedOffset, Utc};
use itertools::Itertools;
use scraper::Html;
use std::collections::HashSet;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Maximum records returned by one [`NewsFetcher::fetch_all`].
pub const MAX_RESULTS: usize = 15;
/// Below this many unique records the generic index is scraped as well.
pub const MIN_RESULTS: usize = 3;
const FALLBACK_LINK_LIMIT: usize = 10;
const FALLBACK_SLUG: &str = "all_news";

/// Runs the strategy pipeline over every configured category page.
pub struct NewsFetcher<F> {
    fetcher: F,
    config: ScraperConfig,
    runner: StrategyRunner,
    base: Url,
    site_offset: FixedOffset,
}

impl<F: PageFetcher> NewsFetcher<F> {
    pub fn new(fetcher: F, config: ScraperConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)?;
        let site_offset = config.site_offset()?;
        Ok(Self {
            fetcher,
            config,
            runner: StrategyRunner::default(),
            base,
            site_offset,
        })
    }

    /// Scrape a single category listing page.
    #[instrument(level = "info", skip_all, fields(category = %feed.slug, url = %feed.url))]
    pub async fn scrape_category(&self, feed: &CategoryFeed, extractor: &Extractor) -> Result<Vec<Article>> {
        let body = self.fetcher.fetch(&feed.url).await?;
        let page = Html::parse_document(&body);
        let articles = self.runner.run(&page, extractor, &feed.slug);
        info!(count = articles.len(), "Scraped category page");
        Ok(articles)
    }

    /// Fetch every category, merge, and return at most [`MAX_RESULTS`]
    /// records with unique links. Never fails; total failure is an empty list.
    #[instrument(level = "info", skip_all)]
    pub async fn fetch_all(&self) -> Vec<Article> {
        let extractor = Extractor::new(self.base.clone(), Utc::now()).with_site_offset(self.site_offset);
        let feeds = &self.config.categories;
        let mut collected = Vec::new();

        for (i, feed) in feeds.iter().enumerate() {
            match self.scrape_category(feed, &extractor).await {
                Ok(articles) => collected.extend(articles),
                Err(e) => error!(category = %feed.slug, error = %e, "Category fetch failed; continuing"),
            }
            if i + 1 < feeds.len() {
                sleep(self.config.request_delay()).await;
            }
        }

        let mut unique: Vec<Article> = collected
            .into_iter()
            .unique_by(Article::link_key)
            .collect();
        info!(count = unique.len(), "Unique articles collected");

        if unique.len() < MIN_RESULTS {
            self.fallback_pass(&extractor, &mut unique).await;
        }

        unique.truncate(MAX_RESULTS);
        unique
    }

    /// Scrape bare `/news/` links from the generic index and merge them in.
    ///
    /// Candidates are keyed by (title, link); a candidate whose link is
    /// already present is still rejected so links stay unique.
    async fn fallback_pass(&self, extractor: &Extractor, articles: &mut Vec<Article>) {
        let url = &self.config.fallback_index_url;
        warn!(count = articles.len(), %url, "Too few articles; scraping news index");

        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                error!(%url, error = %e, "News index fetch failed");
                return;
            }
        };
        let page = Html::parse_document(&body);
        let extra = match NewsLinks::with_limit(FALLBACK_LINK_LIMIT).discover(&page, extractor, FALLBACK_SLUG) {
            Ok(extra) => extra,
            Err(e) => {
                error!(error = %e, "News index extraction failed");
                return;
            }
        };

        let mut links: HashSet<String> = articles.iter().map(Article::link_key).collect();
        let mut pairs: HashSet<(String, String)> = HashSet::new();
        let before = articles.len();
        for article in extra {
            let pair = (article.title.trim().to_lowercase(), article.link_key());
            if links.contains(&pair.1) || !pairs.insert(pair) {
                continue;
            }
            links.insert(article.link_key());
            articles.push(article);
        }
        debug!(added = articles.len() - before, "Fallback pass finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NewsError;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Serves fixed bodies; any other URL fails like a 503.
    #[derive(Default)]
    struct CannedPages {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<(String, Instant)>>,
    }

    impl CannedPages {
        fn with(mut self, url: &str, body: String) -> Self {
            self.pages.insert(url.to_string(), body);
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
        }

        fn request_times(&self) -> Vec<Instant> {
            self.requested.lock().unwrap().iter().map(|(_, at)| *at).collect()
        }
    }

    impl PageFetcher for &CannedPages {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push((url.to_string(), Instant::now()));
            self.pages.get(url).cloned().ok_or_else(|| NewsError::Status {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    fn config() -> ScraperConfig {
        ScraperConfig {
            request_delay_ms: 0,
            ..ScraperConfig::default()
        }
    }

    fn url_for(slug: &str) -> String {
        config()
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .map(|c| c.url.clone())
            .unwrap()
    }

    fn page_of_cards(prefix: &str, range: std::ops::Range<usize>) -> String {
        let cards: String = range
            .map(|i| {
                format!(
                    r#"<div class="news-card"><h3>{prefix} headline number {i:02}</h3><a href="/news/{prefix}/{i}">more</a></div>"#
                )
            })
            .collect();
        format!("<html><body>{cards}</body></html>")
    }

    #[tokio::test]
    async fn test_total_failure_returns_empty() {
        let pages = CannedPages::default();
        let fetcher = NewsFetcher::new(&pages, config()).unwrap();
        let articles = fetcher.fetch_all().await;
        assert!(articles.is_empty());

        let requested = pages.requested();
        assert_eq!(requested.len(), 4);
        assert_eq!(requested.last().unwrap(), "https://www.rmit.edu.au/news");
    }

    #[tokio::test]
    async fn test_deduplicates_across_categories_and_skips_failures() {
        let pages = CannedPages::default()
            .with(&url_for("all_news"), page_of_cards("shared", 0..4))
            .with(&url_for("technology"), page_of_cards("shared", 2..6));
        let fetcher = NewsFetcher::new(&pages, config()).unwrap();
        let articles = fetcher.fetch_all().await;

        assert_eq!(articles.len(), 6);
        let keys: HashSet<_> = articles.iter().map(Article::link_key).collect();
        assert_eq!(keys.len(), articles.len());
        // Enough results: the index page is never requested.
        assert_eq!(pages.requested().len(), 3);
    }

    #[tokio::test]
    async fn test_result_is_capped() {
        let pages = CannedPages::default()
            .with(&url_for("all_news"), page_of_cards("all", 0..20))
            .with(&url_for("technology"), page_of_cards("tech", 0..20))
            .with(&url_for("science"), page_of_cards("sci", 0..20));
        let fetcher = NewsFetcher::new(&pages, config()).unwrap();
        let articles = fetcher.fetch_all().await;

        assert_eq!(articles.len(), MAX_RESULTS);
        assert!(articles.iter().all(|a| a.days_ago == 0 && a.title.len() >= 10));
    }

    #[tokio::test]
    async fn test_fallback_pass_merges_index_links() {
        let index = r#"<html><body>
            <a href="/news/only/0">only headline number 00</a>
            <a href="/news/extra/1">An extra story from the index</a>
            <a href="/news/extra/1">An extra story from the index</a>
            <a href="/news/extra/2">Another story found on the index</a>
            <a href="/news/">News</a>
        </body></html>"#;
        let pages = CannedPages::default()
            .with(&url_for("science"), page_of_cards("only", 0..1))
            .with("https://www.rmit.edu.au/news", index.to_string());
        let fetcher = NewsFetcher::new(&pages, config()).unwrap();
        let articles = fetcher.fetch_all().await;

        let links: Vec<_> = articles.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(
            links,
            [
                "https://www.rmit.edu.au/news/only/0",
                "https://www.rmit.edu.au/news/extra/1",
                "https://www.rmit.edu.au/news/extra/2",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_only_between_category_requests() {
        let pages = CannedPages::default()
            .with(&url_for("all_news"), page_of_cards("all", 0..4))
            .with(&url_for("technology"), page_of_cards("tech", 0..4))
            .with(&url_for("science"), page_of_cards("sci", 0..4));
        let config = ScraperConfig {
            request_delay_ms: 2000,
            ..ScraperConfig::default()
        };
        let delay = config.request_delay();
        let expected_order: Vec<String> = config.categories.iter().map(|c| c.url.clone()).collect();
        let fetcher = NewsFetcher::new(&pages, config).unwrap();

        let start = Instant::now();
        let articles = fetcher.fetch_all().await;
        let elapsed = start.elapsed();

        assert_eq!(articles.len(), 12);
        assert_eq!(pages.requested(), expected_order);

        let times = pages.request_times();
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= delay);
        }
        // Two pauses for three categories; nothing after the last request.
        assert!(elapsed >= delay * 2, "{elapsed:?}");
        assert!(elapsed < delay * 2 + Duration::from_millis(50), "{elapsed:?}");
        assert!(times[2] - start < delay * 2 + Duration::from_millis(50));
    }
}
