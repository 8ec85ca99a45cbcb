//! Command-line interface definitions for News Hub.
//!
//! All options have defaults, and the common ones can also be set through
//! environment variables.

use crate::filters::TimeWindow;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the News Hub application.
///
/// # Examples
///
/// ```sh
/// # Latest cached or live news
/// news_hub
///
/// # Technology stories from the last week, as JSON
/// news_hub --category technology --period 7d --json
///
/// # Ask a question over science news, forcing a fresh scrape
/// news_hub --category science --refresh --question "Any new publications?"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML scraper configuration
    #[arg(short, long, env = "NEWS_HUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache file location (overrides the config file)
    #[arg(long, env = "NEWS_HUB_CACHE")]
    pub cache_path: Option<PathBuf>,

    /// Category label to show: all, "All News", Technology or Science
    #[arg(long, default_value = "all")]
    pub category: String,

    /// Time window to show
    #[arg(short, long, value_enum, default_value_t = TimeWindow::AllTime)]
    pub period: TimeWindow,

    /// Question to ask about the filtered articles
    #[arg(short, long)]
    pub question: Option<String>,

    /// Discard the cache and scrape the site again
    #[arg(long)]
    pub refresh: bool,

    /// Print the filtered articles as JSON instead of Markdown
    #[arg(long)]
    pub json: bool,
}
