//! "Current article set": cache first, network second, demo content last.

use crate::cache::{CacheLookup, CacheStore, Clock};
use crate::http::PageFetcher;
use crate::models::{Article, Category, Source};
use crate::scrapers::fetch::NewsFetcher;
use tracing::{info, instrument, warn};

/// Serve fresh cached articles, or fetch live ones and cache them.
///
/// An empty result means no live data was available; it is not written to
/// the cache, and callers decide what to show instead (see [`demo_articles`]).
#[instrument(level = "info", skip_all)]
pub async fn load_articles<C, F>(cache: &CacheStore<C>, fetcher: &NewsFetcher<F>) -> Vec<Article>
where
    C: Clock,
    F: PageFetcher,
{
    match cache.read().await {
        CacheLookup::Hit(articles) => return articles,
        CacheLookup::Miss(reason) => info!(%reason, "Cache miss; fetching live news"),
    }

    let articles = fetcher.fetch_all().await;
    if articles.is_empty() {
        warn!("Live fetch returned no articles");
        return articles;
    }
    if let Err(e) = cache.write(&articles).await {
        warn!(error = %e, "Failed to save news cache");
    }
    articles
}

/// Built-in placeholder shown when neither cache nor network produced
/// anything.
pub fn demo_articles() -> Vec<Article> {
    vec![Article {
        title: "RMIT launches AI innovation hub".to_string(),
        link: "https://www.rmit.edu.au/news".to_string(),
        summary: "RMIT University unveils its new AI and technology initiative.".to_string(),
        published: "Fri, 31 Oct 2025 13:21:50 GMT".to_string(),
        days_ago: 0,
        category: Category::Technology,
        source: Source::Demo,
    }]
}
