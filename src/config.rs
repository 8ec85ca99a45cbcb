//! Scraper configuration.
//!
//! Every field has a default matching the RMIT news site, so the binary runs
//! without a config file. A YAML file passed via `--config` can override any
//! subset of keys:
//!
//! ```yaml
//! request_delay_ms: 500
//! cache_path: /tmp/news_cache.json
//! categories:
//!   - slug: all_news
//!     url: https://www.rmit.edu.au/news/all-news
//! ```

use crate::error::{NewsError, Result};
use chrono::{FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// One listing page to scrape, keyed by the category slug it represents.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryFeed {
    pub slug: String,
    pub url: String,
}

impl CategoryFeed {
    pub fn new(slug: &str, url: &str) -> Self {
        Self {
            slug: slug.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Origin used to resolve relative links.
    pub base_url: String,
    /// Listing pages, fetched in this order.
    pub categories: Vec<CategoryFeed>,
    /// Generic index scraped for bare links when too few articles were found.
    pub fallback_index_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Pause between consecutive category requests.
    pub request_delay_ms: u64,
    pub cache_path: String,
    pub cache_ttl_secs: i64,
    /// UTC offset of the site's calendar; "days ago" counts from the local
    /// date there, not the UTC date. Daylight saving is not tracked.
    pub site_utc_offset_secs: i32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.rmit.edu.au".to_string(),
            categories: vec![
                CategoryFeed::new("all_news", "https://www.rmit.edu.au/news/all-news"),
                CategoryFeed::new("technology", "https://www.rmit.edu.au/news/technology"),
                CategoryFeed::new("science", "https://www.rmit.edu.au/news/science"),
            ],
            fallback_index_url: "https://www.rmit.edu.au/news".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 15,
            request_delay_ms: 2000,
            cache_path: "news_cache.json".to_string(),
            cache_ttl_secs: 3600,
            site_utc_offset_secs: 10 * 3600,
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Cache time-to-live. Negative or out-of-range values are rejected.
    pub fn cache_ttl(&self) -> Result<TimeDelta> {
        TimeDelta::try_seconds(self.cache_ttl_secs)
            .filter(|ttl| *ttl >= TimeDelta::zero())
            .ok_or_else(|| NewsError::InvalidConfig(format!("cache_ttl_secs out of range: {}", self.cache_ttl_secs)))
    }

    pub fn site_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.site_utc_offset_secs).ok_or_else(|| {
            NewsError::InvalidConfig(format!("site_utc_offset_secs out of range: {}", self.site_utc_offset_secs))
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a YAML file, or return the defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&raw)?;
        info!(path = %path.display(), categories = config.categories.len(), "Loaded scraper configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.request_delay(), Duration::from_secs(2));
        let slugs: Vec<_> = config.categories.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, ["all_news", "technology", "science"]);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ScraperConfig::from_yaml("request_delay_ms: 0\ncache_path: /tmp/x.json\n").unwrap();
        assert_eq!(config.request_delay_ms, 0);
        assert_eq!(config.cache_path, "/tmp/x.json");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.categories.len(), 3);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(ScraperConfig::from_yaml("timeout_secs: [not, a, number]").is_err());
    }

    #[test]
    fn test_cache_ttl_bounds() {
        assert_eq!(ScraperConfig::default().cache_ttl().unwrap(), TimeDelta::hours(1));

        for secs in [i64::MAX, i64::MIN, -1] {
            let config = ScraperConfig {
                cache_ttl_secs: secs,
                ..ScraperConfig::default()
            };
            assert!(matches!(config.cache_ttl(), Err(NewsError::InvalidConfig(_))), "{secs}");
        }
    }

    #[test]
    fn test_site_offset() {
        let config = ScraperConfig::default();
        assert_eq!(config.site_offset().unwrap().local_minus_utc(), 36_000);

        let config = ScraperConfig::from_yaml("site_utc_offset_secs: 90000\n").unwrap();
        assert!(config.site_offset().is_err());
    }

    #[tokio::test]
    async fn test_load_without_path_uses_defaults() {
        let config = ScraperConfig::load(None).await.unwrap();
        assert_eq!(config.base_url, "https://www.rmit.edu.au");
    }
}
