//! Prompt construction for the question-answering step.
//!
//! The generator only ever sees what is built here: a numbered list of at
//! most [`MAX_PROMPT_ARTICLES`] filtered records plus the user's question.

use crate::filters::CategoryFilter;
use crate::models::{Article, Category, Source};
use std::fmt::Write;

pub const MAX_PROMPT_ARTICLES: usize = 8;

/// Starter questions offered when the user has not asked anything yet.
pub fn suggested_questions(category: CategoryFilter) -> &'static [&'static str] {
    match category {
        CategoryFilter::All | CategoryFilter::Only(Category::AllNews) => &[
            "What's happening at RMIT this week?",
            "Show me the latest university announcements",
            "Any major achievements or awards recently?",
            "What are the big stories across the uni right now?",
        ],
        CategoryFilter::Only(Category::Technology) => &[
            "What's new in RMIT's technology research?",
            "Latest computing and AI developments",
            "Cybersecurity initiatives and projects",
            "Tech industry partnerships at RMIT",
        ],
        CategoryFilter::Only(Category::Science) => &[
            "Recent scientific breakthroughs at RMIT",
            "New publications from RMIT researchers",
            "What labs or studies were featured lately?",
            "Any environment or climate-related findings?",
        ],
    }
}

/// `TODAY`, `YESTERDAY`, or `N DAYS AGO`.
pub fn recency_label(days_ago: u32) -> String {
    match days_ago {
        0 => "TODAY".to_string(),
        1 => "YESTERDAY".to_string(),
        n => format!("{n} DAYS AGO"),
    }
}

pub fn source_label(source: Source) -> &'static str {
    match source {
        Source::Live => "LIVE",
        Source::Demo => "SAMPLE",
    }
}

/// Build the prompt for `question` over `articles`, described by `filters`.
pub fn build_news_prompt(articles: &[Article], question: &str, filters: &str) -> String {
    if articles.is_empty() {
        return format!(
            r#"I've searched through RMIT's latest news, but no articles match your current filters: {filters}

Please try:
- Selecting "All News" to see all available content
- Adjusting the time period filter
- Visiting the official RMIT website for complete information

User Question: "{question}"
"#
        );
    }

    let mut listing = String::new();
    for (i, article) in articles.iter().take(MAX_PROMPT_ARTICLES).enumerate() {
        // Writing to a String cannot fail.
        let _ = write!(
            listing,
            "\n{}. *{}* [{}]\n   - Published: {}\n   - Summary: {}\n   - Link: {}\n",
            i + 1,
            article.title,
            source_label(article.source),
            recency_label(article.days_ago),
            article.summary,
            if article.has_link() { article.link.as_str() } else { "Not available" },
        );
    }

    format!(
        r#"You are an RMIT University News Assistant. I've fetched relevant news based on the user's filters.

*CONTEXT:*
Active Filters: {filters}
Number of Relevant Articles: {count}
Data Source: RMIT University Website

*RELEVANT RMIT NEWS ARTICLES:*
{listing}
*USER QUESTION:*
"{question}"

*IMPORTANT INSTRUCTIONS:*
1. Use ONLY the provided articles to answer the question
2. Be specific - mention article titles and key details
3. Include relevant links when available
4. If the articles don't fully answer the question, acknowledge this honestly
5. Keep responses student-focused and helpful
6. Mention the recency of information when relevant

Provide a comprehensive, accurate response based on these articles.
"#,
        count = articles.len(),
    )
}
