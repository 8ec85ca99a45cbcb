//! JSON output of an article set, in the same shape the cache stores.

use crate::error::Result;
use crate::models::Article;
use serde::Serialize;
use tracing::instrument;

#[derive(Serialize)]
struct ArticleList<'a> {
    total_articles: usize,
    articles: &'a [Article],
}

/// Serialize `articles` with a count header.
#[instrument(level = "debug", skip_all, fields(count = articles.len()))]
pub fn articles_to_json(articles: &[Article]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ArticleList {
        total_articles: articles.len(),
        articles,
    })?)
}
