//! Field extraction: one candidate node in, zero or one [`Article`] out.
//!
//! Every field is resolved through an ordered chain of fallbacks and always
//! ends in a default, so a missing piece of markup never aborts the record.
//! The only hard rejection is a title shorter than [`MIN_TITLE_CHARS`],
//! which almost always means the node was navigation chrome, not a story.

use crate::models::{Article, Category, Source};
use crate::scrapers::{classify, dates};
use crate::utils::{collapse_whitespace, cut_then_ellipsis, resolve_link, truncate_with_ellipsis};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::trace;
use url::Url;

pub const MIN_TITLE_CHARS: usize = 10;
pub const MAX_SUMMARY_CHARS: usize = 200;
/// Paragraphs shorter than this are bylines or captions, not summaries.
const MIN_PARAGRAPH_CHARS: usize = 30;
/// Leftover node text must be at least this long to stand in for a summary.
const MIN_LEFTOVER_CHARS: usize = 50;
const LEFTOVER_CUT_CHARS: usize = 150;
const SITE_NAME: &str = "RMIT University";

static HEADINGS: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static CLASSED_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p[class], div[class]").unwrap());
static DESCRIPTION_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)description|summary|excerpt").unwrap());

/// Date-bearing elements, most trustworthy first.
static DATE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "time[datetime]",
        "time",
        ".date",
        ".published",
        ".timestamp",
        ".news-date",
        ".card-date",
        "[datetime]",
    ]
    .iter()
    .map(|s| Selector::parse(s).unwrap())
    .collect()
});

/// Calendar dates written into running text.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    const MONTH: &str = r"(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*";
    [
        format!(r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+{MONTH}\s+\d{{4}}\b"),
        format!(r"(?i)\b{MONTH}\s+\d{{1,2}}(?:st|nd|rd|th)?,\s+\d{{4}}\b"),
        r"\b\d{1,2}/\d{1,2}/\d{4}\b".to_string(),
        r"\b\d{4}-\d{2}-\d{2}\b".to_string(),
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Visible text of an element, pieces joined by spaces and collapsed.
pub fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// The anchor that represents `node`: the node itself if it is a link,
/// otherwise its first descendant anchor.
fn primary_anchor(node: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if node.value().name() == "a" {
        Some(node)
    } else {
        node.select(&ANCHOR).next()
    }
}

fn find_title(node: ElementRef<'_>) -> Option<String> {
    node.select(&HEADINGS)
        .map(element_text)
        .find(|t| !t.is_empty())
        .or_else(|| primary_anchor(node).map(element_text).filter(|t| !t.is_empty()))
}

fn default_summary(lead: &str, category_slug: &str) -> String {
    match Category::from_slug(category_slug) {
        Category::AllNews => format!("{lead} news from {SITE_NAME}"),
        other => format!("{lead} {other} news from {SITE_NAME}"),
    }
}

fn find_summary(node: ElementRef<'_>, title: &str, category_slug: &str) -> String {
    let described = || {
        node.select(&CLASSED_BLOCK)
            .filter(|el| {
                el.value()
                    .attr("class")
                    .is_some_and(|c| DESCRIPTION_CLASS.is_match(c))
            })
            .map(element_text)
            .find(|t| !t.is_empty())
    };
    let paragraph = || {
        node.select(&PARAGRAPH)
            .map(element_text)
            .find(|t| t.chars().count() > MIN_PARAGRAPH_CHARS)
    };
    let leftover = || {
        let rest = collapse_whitespace(&element_text(node).replace(title, ""));
        (rest.chars().count() > MIN_LEFTOVER_CHARS).then(|| cut_then_ellipsis(&rest, LEFTOVER_CUT_CHARS))
    };

    let summary = described()
        .or_else(paragraph)
        .or_else(leftover)
        .unwrap_or_else(|| default_summary("Latest", category_slug));
    truncate_with_ellipsis(&collapse_whitespace(&summary), MAX_SUMMARY_CHARS)
}

/// Raw date text found inside `node`, if any.
///
/// Date-bearing elements are checked first, preferring their `datetime`
/// attribute over their text. Failing that, the node's visible text is
/// searched for a calendar date.
pub fn find_date_text(node: ElementRef<'_>) -> Option<String> {
    for selector in DATE_SELECTORS.iter() {
        if let Some(el) = node.select(selector).next() {
            let value = el
                .value()
                .attr("datetime")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| element_text(el));
            if !value.is_empty() {
                return Some(value);
            }
        }
    }

    let text = element_text(node);
    DATE_PATTERNS
        .iter()
        .find_map(|re| re.find(&text))
        .map(|m| m.as_str().to_string())
}

/// Turns candidate nodes into [`Article`]s relative to one fetch moment.
#[derive(Debug, Clone)]
pub struct Extractor {
    base: Url,
    fetched_at: DateTime<Utc>,
    site_offset: FixedOffset,
}

impl Extractor {
    pub fn new(base: Url, fetched_at: DateTime<Utc>) -> Self {
        Self {
            base,
            fetched_at,
            site_offset: Utc.fix(),
        }
    }

    /// Count days on the site's calendar instead of UTC's.
    pub fn with_site_offset(mut self, offset: FixedOffset) -> Self {
        self.site_offset = offset;
        self
    }

    /// The fetch date as the site's readers see it.
    pub fn today(&self) -> NaiveDate {
        self.fetched_at.with_timezone(&self.site_offset).date_naive()
    }

    /// Extract a record from a container node (card, article, list item).
    pub fn extract(&self, node: ElementRef<'_>, category_slug: &str) -> Option<Article> {
        let title = find_title(node).filter(|t| t.chars().count() >= MIN_TITLE_CHARS)?;
        let link = resolve_link(
            &self.base,
            primary_anchor(node).and_then(|a| a.value().attr("href")),
        );
        let summary = find_summary(node, &title, category_slug);
        let date_text = find_date_text(node);
        Some(self.build(title, link, summary, date_text, category_slug))
    }

    /// Extract a record from a bare anchor. The date is looked up in the
    /// anchor's parent, since a lone link rarely carries one itself.
    pub fn extract_link(&self, anchor: ElementRef<'_>, category_slug: &str) -> Option<Article> {
        let title = Some(element_text(anchor)).filter(|t| t.chars().count() >= MIN_TITLE_CHARS)?;
        let link = resolve_link(&self.base, anchor.value().attr("href"));
        let summary = default_summary("Recent", category_slug);
        let date_text = anchor
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(find_date_text);
        Some(self.build(title, link, summary, date_text, category_slug))
    }

    fn build(
        &self,
        title: String,
        link: String,
        summary: String,
        date_text: Option<String>,
        category_slug: &str,
    ) -> Article {
        let days_ago = dates::days_since(date_text.as_deref(), self.today());
        let published = (self.fetched_at - Duration::days(i64::from(days_ago)))
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string();
        let category = classify::classify(&title, &summary, category_slug);
        trace!(%title, %link, days_ago, %category, "Extracted article");

        Article {
            title,
            link,
            summary,
            published,
            days_ago,
            category,
            source: Source::Live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use scraper::Html;

    fn extractor() -> Extractor {
        Extractor::new(
            Url::parse("https://www.rmit.edu.au").unwrap(),
            Utc.with_ymd_and_hms(2025, 2, 10, 12, 0, 0).unwrap(),
        )
    }

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        doc.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    #[test]
    fn test_full_card() {
        let doc = Html::parse_fragment(
            r#"<div class="card">
                 <h3>  Students build   a solar car </h3>
                 <a href="/news/all-news/2025/feb/solar-car">Read more</a>
                 <p>Short.</p>
                 <p>The team spent two years designing a vehicle powered only by sunlight.</p>
                 <time datetime="2025-02-07">7 February</time>
               </div>"#,
        );
        let a = extractor().extract(first(&doc, ".card"), "all_news").unwrap();
        assert_eq!(a.title, "Students build a solar car");
        assert_eq!(a.link, "https://www.rmit.edu.au/news/all-news/2025/feb/solar-car");
        assert_eq!(
            a.summary,
            "The team spent two years designing a vehicle powered only by sunlight."
        );
        assert_eq!(a.days_ago, 3);
        assert_eq!(a.published, "Fri, 07 Feb 2025 12:00:00 GMT");
        assert_eq!(a.category, Category::AllNews);
        assert_eq!(a.source, Source::Live);
    }

    #[test]
    fn test_short_title_rejected() {
        let doc = Html::parse_fragment(r#"<div class="card"><h3>Menu</h3><a href="/x">Go</a></div>"#);
        assert!(extractor().extract(first(&doc, ".card"), "all_news").is_none());
    }

    #[test]
    fn test_empty_heading_falls_back_to_link_text() {
        let doc = Html::parse_fragment(
            r#"<div class="card"><h2>  </h2><a href="/news/story">Campus reopens after the summer break</a></div>"#,
        );
        let a = extractor().extract(first(&doc, ".card"), "all_news").unwrap();
        assert_eq!(a.title, "Campus reopens after the summer break");
    }

    #[test]
    fn test_missing_href_uses_placeholder() {
        let doc = Html::parse_fragment(
            r#"<article><h2>Open day attracts record crowds</h2><a>no link</a></article>"#,
        );
        let a = extractor().extract(first(&doc, "article"), "all_news").unwrap();
        assert_eq!(a.link, "#");
        assert!(!a.has_link());
    }

    #[test]
    fn test_node_that_is_itself_a_link() {
        let doc = Html::parse_fragment(
            r#"<a class="card" href="/news/all-news/graduation"><h3>Graduation ceremonies return</h3></a>"#,
        );
        let a = extractor().extract(first(&doc, "a.card"), "all_news").unwrap();
        assert_eq!(a.link, "https://www.rmit.edu.au/news/all-news/graduation");
    }

    #[test]
    fn test_description_class_preferred() {
        let doc = Html::parse_fragment(
            r#"<div class="news-item"><h3>Alumni honoured at gala dinner</h3>
               <p>This paragraph is definitely longer than thirty characters.</p>
               <div class="card-description">Gala recap</div></div>"#,
        );
        let a = extractor().extract(first(&doc, ".news-item"), "all_news").unwrap();
        assert_eq!(a.summary, "Gala recap");
    }

    #[test]
    fn test_leftover_text_summary() {
        let leftover = "word ".repeat(40);
        let html = format!(
            r#"<div class="card"><h3>Alumni honoured at gala dinner</h3><span>{leftover}</span></div>"#
        );
        let doc = Html::parse_fragment(&html);
        let a = extractor().extract(first(&doc, ".card"), "all_news").unwrap();
        assert!(!a.summary.contains("Alumni honoured"));
        assert!(a.summary.ends_with("..."));
        assert_eq!(a.summary.chars().count(), 153);
    }

    #[test]
    fn test_default_summary_mentions_category() {
        let doc = Html::parse_fragment(r#"<div class="card"><h3>Graduation week wrap-up</h3></div>"#);
        let a = extractor().extract(first(&doc, ".card"), "science").unwrap();
        assert_eq!(a.summary, "Latest Science news from RMIT University");
        assert_eq!(a.category, Category::Science);
    }

    #[test]
    fn test_summary_capped() {
        let long = "Sentence about campus life. ".repeat(20);
        let html = format!(r#"<div class="card"><h3>Campus life in review</h3><p>{long}</p></div>"#);
        let doc = Html::parse_fragment(&html);
        let a = extractor().extract(first(&doc, ".card"), "all_news").unwrap();
        assert_eq!(a.summary.chars().count(), MAX_SUMMARY_CHARS);
        assert!(a.summary.ends_with("..."));
    }

    #[test]
    fn test_date_attribute_beats_text() {
        let doc = Html::parse_fragment(
            r#"<div><span class="date" datetime="2025-01-31">yesterday-ish</span><p>1 Feb 2025</p></div>"#,
        );
        assert_eq!(find_date_text(first(&doc, "div")).as_deref(), Some("2025-01-31"));
    }

    #[test]
    fn test_date_text_regex_fallback() {
        let doc = Html::parse_fragment(r#"<div><p>Published on 5th Feb 2025 by the media team</p></div>"#);
        assert_eq!(find_date_text(first(&doc, "div")).as_deref(), Some("5th Feb 2025"));

        let doc = Html::parse_fragment(r#"<div><p>Updated February 3, 2025</p></div>"#);
        assert_eq!(find_date_text(first(&doc, "div")).as_deref(), Some("February 3, 2025"));

        let doc = Html::parse_fragment(r#"<div><p>No date in here at all</p></div>"#);
        assert_eq!(find_date_text(first(&doc, "div")), None);
    }

    #[test]
    fn test_empty_date_element_is_skipped() {
        let doc = Html::parse_fragment(
            r#"<div><time></time><span class="published">2025-02-09</span></div>"#,
        );
        assert_eq!(find_date_text(first(&doc, "div")).as_deref(), Some("2025-02-09"));
    }

    #[test]
    fn test_extract_link_uses_parent_date() {
        let doc = Html::parse_fragment(
            r#"<li><a href="/news/all-news/robots">Robots learn to walk on ice</a> <span>8 Feb 2025</span></li>"#,
        );
        let a = extractor().extract_link(first(&doc, "a"), "all_news").unwrap();
        assert_eq!(a.link, "https://www.rmit.edu.au/news/all-news/robots");
        assert_eq!(a.summary, "Recent news from RMIT University");
        assert_eq!(a.days_ago, 2);
        assert_eq!(a.category, Category::Technology);
    }

    #[test]
    fn test_days_count_from_site_date() {
        let doc = Html::parse_fragment(
            r#"<div class="card"><h3>Alumni honoured at gala dinner</h3><time datetime="2025-02-10"></time></div>"#,
        );
        // 20:00 UTC on the 10th is already the 11th in Melbourne.
        let evening = Utc.with_ymd_and_hms(2025, 2, 10, 20, 0, 0).unwrap();
        let base = Url::parse("https://www.rmit.edu.au").unwrap();

        let utc = Extractor::new(base.clone(), evening);
        assert_eq!(utc.extract(first(&doc, ".card"), "all_news").unwrap().days_ago, 0);

        let melbourne = Extractor::new(base, evening).with_site_offset(FixedOffset::east_opt(10 * 3600).unwrap());
        assert_eq!(melbourne.today(), NaiveDate::from_ymd_opt(2025, 2, 11).unwrap());
        assert_eq!(melbourne.extract(first(&doc, ".card"), "all_news").unwrap().days_ago, 1);
    }

    #[test]
    fn test_extract_link_rejects_short_text() {
        let doc = Html::parse_fragment(r#"<p><a href="/news/">News</a></p>"#);
        assert!(extractor().extract_link(first(&doc, "a"), "all_news").is_none());
    }
}
