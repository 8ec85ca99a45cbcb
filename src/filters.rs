//! Category and time-window filters applied before display and prompting.

use crate::models::{Article, Category};
use clap::ValueEnum;
use std::fmt;

/// Category predicate: everything, or one exact label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse a label case-insensitively. `all` and `All News` mean no
    /// filtering; unknown labels are `None`.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("all") || label.eq_ignore_ascii_case(Category::AllNews.label()) {
            return Some(CategoryFilter::All);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
            .map(CategoryFilter::Only)
    }

    pub fn matches(&self, article: &Article) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => article.category == *category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(Category::AllNews.label()),
            CategoryFilter::Only(category) => f.write_str(category.label()),
        }
    }
}

/// How far back to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeWindow {
    #[value(name = "all")]
    AllTime,
    #[value(name = "7d")]
    Last7Days,
    #[value(name = "30d")]
    Last30Days,
    #[value(name = "90d")]
    Last3Months,
}

impl TimeWindow {
    /// Inclusive day limit, or `None` for unbounded.
    pub fn max_days(&self) -> Option<u32> {
        match self {
            TimeWindow::AllTime => None,
            TimeWindow::Last7Days => Some(7),
            TimeWindow::Last30Days => Some(30),
            TimeWindow::Last3Months => Some(90),
        }
    }

    pub fn matches(&self, article: &Article) -> bool {
        self.max_days().is_none_or(|max| article.days_ago <= max)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeWindow::AllTime => "All Time",
            TimeWindow::Last7Days => "Last 7 Days",
            TimeWindow::Last30Days => "Last 30 Days",
            TimeWindow::Last3Months => "Last 3 Months",
        };
        f.write_str(s)
    }
}

/// Apply the category filter, then the time window, preserving order.
pub fn apply_filters(articles: &[Article], category: CategoryFilter, window: TimeWindow) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| category.matches(a) && window.matches(a))
        .cloned()
        .collect()
}

/// Human-readable description used in prompts, e.g.
/// `"Category: Science, Time: Last 7 Days"`.
pub fn describe(category: CategoryFilter, window: TimeWindow) -> String {
    format!("Category: {category}, Time: {window}")
}
