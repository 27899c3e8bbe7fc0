//! Link extraction and classification
//!
//! Every `<a href>` on a page is resolved against the page URL, filtered
//! (off-domain, junk, already visited) and sorted into priority links, which
//! lead to topic and listing pages, and normal links.

use crate::url::{is_valid_url, resolve_href};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Anchor-text fragments that mark a navigation/topic link
pub const PRIORITY_KEYWORDS: &[&str] = &["see all", "topic", "week", "trimester"];

/// Links found on one page, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Topic/listing links, explored depth-first
    pub priority: Vec<String>,

    /// Everything else, explored breadth-first
    pub normal: Vec<String>,
}

impl ExtractedLinks {
    pub fn len(&self) -> usize {
        self.priority.len() + self.normal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priority.is_empty() && self.normal.is_empty()
    }
}

/// Returns true if the anchor text marks a priority link
pub fn is_priority_anchor(text: &str) -> bool {
    let lowered = text.to_lowercase();
    PRIORITY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Parses HTML and extracts the crawlable links
///
/// # Link Rules
///
/// **Dropped:**
/// - hrefs that do not resolve to an absolute `http(s)` URL with a host
/// - URLs whose netloc does not contain `base_domain`
/// - URLs containing a junk marker (login, signup, register, search, video,
///   advertisement), whatever the anchor text says
/// - URLs already in `visited`
///
/// **Priority:** anchor text containing "see all", "topic", "week" or
/// "trimester" (case-insensitive).
///
/// # Example
///
/// ```
/// use article_crawler::crawler::extract_links;
/// use std::collections::HashSet;
/// use url::Url;
///
/// let html = r#"<a href="/weeks">See all weeks</a><a href="/about">About</a>"#;
/// let base = Url::parse("https://example.com/hub").unwrap();
/// let links = extract_links(html, &base, "example.com", &HashSet::new());
/// assert_eq!(links.priority, vec!["https://example.com/weeks".to_string()]);
/// assert_eq!(links.normal, vec!["https://example.com/about".to_string()]);
/// ```
pub fn extract_links(
    html: &str,
    base_url: &Url,
    base_domain: &str,
    visited: &HashSet<String>,
) -> ExtractedLinks {
    let document = Html::parse_document(html);
    extract_links_from(&document, base_url, base_domain, visited)
}

/// Same as [`extract_links`] for an already parsed document
pub fn extract_links_from(
    document: &Html,
    base_url: &Url,
    base_domain: &str,
    visited: &HashSet<String>,
) -> ExtractedLinks {
    let mut links = ExtractedLinks::default();

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(resolved) = resolve_href(href, base_url) else {
            continue;
        };

        if !is_valid_url(&resolved, base_domain) {
            continue;
        }

        let url = String::from(resolved);
        if visited.contains(&url) {
            continue;
        }

        let anchor_text = element.text().collect::<String>();
        if is_priority_anchor(&anchor_text) {
            links.priority.push(url);
        } else {
            links.normal.push(url);
        }
    }

    links
}
