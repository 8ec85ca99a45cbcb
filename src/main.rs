//! # News Hub
//!
//! Scrapes short news summaries from the RMIT University website, caches
//! them for an hour, and lets you filter them and ask questions about them.
//!
//! ## Usage
//!
//! ```sh
//! news_hub --category technology --period 30d --question "Latest AI work?"
//! ```
//!
//! ## Architecture
//!
//! 1. **Cache**: serve the last fetch if it is under an hour old
//! 2. **Scrape**: otherwise fetch each category page in turn and extract
//!    records with layered heuristics
//! 3. **Filter**: narrow by category label and time window
//! 4. **Output**: Markdown or JSON listing, plus an optional generated answer

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cache;
mod cli;
mod config;
mod error;
mod feed;
mod filters;
mod http;
mod models;
mod outputs;
mod prompt;
mod scrapers;
mod utils;

use api::{DemoGenerator, Generator};
use cache::CacheStore;
use cli::Cli;
use config::ScraperConfig;
use filters::{CategoryFilter, apply_filters, describe};
use http::HttpFetcher;
use outputs::{json, markdown};
use scrapers::fetch::NewsFetcher;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("news_hub starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let Some(category) = CategoryFilter::parse(&args.category) else {
        error!(category = %args.category, "Unknown category label");
        return Err(format!("unknown category `{}` (expected all, Technology or Science)", args.category).into());
    };

    let mut config = ScraperConfig::load(args.config.as_deref()).await?;
    if let Some(path) = &args.cache_path {
        config.cache_path = path.display().to_string();
    }

    let cache = CacheStore::new(&config.cache_path, config.cache_ttl()?);
    info!(path = %cache.path().display(), "Using news cache");
    if args.refresh {
        cache.clear().await?;
    }

    // ---- Current article set ----
    let fetcher = NewsFetcher::new(HttpFetcher::from_config(&config)?, config)?;
    let mut articles = feed::load_articles(&cache, &fetcher).await;
    if articles.is_empty() {
        warn!("No live or cached articles; showing sample content");
        articles = feed::demo_articles();
    }

    // ---- Filter & render ----
    let shown = apply_filters(&articles, category, args.period);
    info!(total = articles.len(), shown = shown.len(), %category, period = %args.period, "Applied filters");

    if args.json {
        println!("{}", json::articles_to_json(&shown)?);
    } else {
        let in_window = apply_filters(&articles, CategoryFilter::All, args.period);
        println!("{}", markdown::quick_stats(&in_window, args.period));
        println!("{}", markdown::article_list("Latest News", &shown));
    }

    // ---- Optional question ----
    if let Some(question) = args.question.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let context = if shown.is_empty() {
            warn!("No articles found for the filters; answering over all articles");
            &articles
        } else {
            &shown
        };
        let prompt = prompt::build_news_prompt(context, question, &describe(category, args.period));
        let answer = DemoGenerator::default().generate(&prompt).await?;
        println!("## News Analysis\n\n{answer}");
    } else if !args.json {
        println!("## Suggested Questions\n");
        for q in prompt::suggested_questions(category) {
            println!("- {q}");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
