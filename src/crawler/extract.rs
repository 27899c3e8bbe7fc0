//! Article classification and content extraction
//!
//! A page counts as an article when its `<p>` elements hold enough text.
//! For articles, the content block is taken from the first structural
//! container that yields enough text, falling back to the whole body.

use crate::storage::ArticleRecord;
use crate::url::netloc;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Paragraph text needed to count as an article, and content length that
/// ends the candidate search early
pub const DEFAULT_MIN_ARTICLE_CHARS: usize = 500;

/// Title used when the page has none
pub const NO_TITLE: &str = "No Title";

/// Content containers, tried in order
pub const CONTENT_CANDIDATES: &[&str] = &["div.article-body", "article", "main", "div.content", "body"];

/// Elements whose text never counts as content
const SKIPPED_TEXT_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Why a page was not turned into an article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotArticle {
    /// Paragraph text below the threshold: a navigation or listing page
    LowDensity { paragraph_chars: usize },

    /// No candidate container produced any text
    NoContent,

    /// URL has no host to record as source domain
    NoHost,
}

/// Outcome of classifying one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Article(ArticleRecord),
    NotArticle(NotArticle),
}

impl Classification {
    pub fn is_article(&self) -> bool {
        matches!(self, Self::Article(_))
    }

    pub fn into_article(self) -> Option<ArticleRecord> {
        match self {
            Self::Article(record) => Some(record),
            Self::NotArticle(_) => None,
        }
    }
}

/// One content container strategy
struct ContentCandidate {
    name: &'static str,
    selector: Selector,
}

/// Classifies pages and extracts article content
pub struct ContentExtractor {
    min_chars: usize,
    candidates: Vec<ContentCandidate>,
}

impl ContentExtractor {
    pub fn new(min_chars: usize) -> Self {
        let candidates = CONTENT_CANDIDATES
            .iter()
            .filter_map(|css| {
                Selector::parse(css).ok().map(|selector| ContentCandidate {
                    name: css,
                    selector,
                })
            })
            .collect();

        Self {
            min_chars,
            candidates,
        }
    }

    /// Threshold in characters
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Decides whether the page is an article and builds its record
    ///
    /// # Algorithm
    ///
    /// 1. Paragraph text below `min_chars` → `LowDensity`
    /// 2. Title from `<title>`, or "No Title"
    /// 3. Candidates tried in order; the first whose text is longer than
    ///    `min_chars` wins, otherwise the last one with any text
    /// 4. No text anywhere → `NoContent`
    pub fn classify(&self, document: &Html, url: &Url) -> Classification {
        let paragraph_chars = paragraph_text_len(document);
        if paragraph_chars < self.min_chars {
            return Classification::NotArticle(NotArticle::LowDensity { paragraph_chars });
        }

        let Some(source_domain) = netloc(url) else {
            return Classification::NotArticle(NotArticle::NoHost);
        };

        let Some(content) = self.extract_content(document) else {
            return Classification::NotArticle(NotArticle::NoContent);
        };

        Classification::Article(ArticleRecord {
            url: url.to_string(),
            title: extract_title(document).unwrap_or_else(|| NO_TITLE.to_string()),
            content,
            source_domain,
        })
    }

    /// Runs the candidate strategies, keeping the best text so far
    fn extract_content(&self, document: &Html) -> Option<String> {
        let mut best: Option<String> = None;

        for candidate in &self.candidates {
            let Some(element) = document.select(&candidate.selector).next() else {
                continue;
            };

            let text = element_text(element);
            if text.is_empty() {
                continue;
            }

            let long_enough = text.chars().count() > self.min_chars;
            tracing::trace!(
                "Content candidate {} yielded {} chars",
                candidate.name,
                text.chars().count()
            );
            // A later, shorter candidate still replaces an earlier one here
            best = Some(text);
            if long_enough {
                break;
            }
        }

        best
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ARTICLE_CHARS)
    }
}

/// Classifies a raw HTML page with the default threshold
///
/// # Example
///
/// ```
/// use article_crawler::crawler::{classify_and_extract, Classification};
/// use url::Url;
///
/// let url = Url::parse("https://example.com/nav").unwrap();
/// let result = classify_and_extract("<p>short</p>", &url);
/// assert!(matches!(result, Classification::NotArticle(_)));
/// ```
pub fn classify_and_extract(html: &str, url: &Url) -> Classification {
    let document = Html::parse_document(html);
    ContentExtractor::default().classify(&document, url)
}

/// Total characters of text inside all `<p>` elements
pub fn paragraph_text_len(document: &Html) -> usize {
    let Ok(selector) = Selector::parse("p") else {
        return 0;
    };

    document
        .select(&selector)
        .map(|p| p.text().map(|t| t.chars().count()).sum::<usize>())
        .sum()
}

/// Trimmed text of the first `<title>`, if present and non-blank
pub fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Text of an element: every text node trimmed, blanks dropped, joined by newlines
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut pieces = Vec::new();
    collect_text(element, &mut pieces);
    pieces.join("\n")
}

fn collect_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed);
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !SKIPPED_TEXT_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, pieces);
            }
        }
    }
}
