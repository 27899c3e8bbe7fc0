//! Sitemap discovery
//!
//! An alternate frontier seeder: collects page URLs from `<origin>/sitemap.xml`
//! and any `Sitemap:` lines in `<origin>/robots.txt`, following nested sitemap
//! indexes. Scanning is plain string matching on `<loc>` elements; no XML
//! parser is involved.

use crate::crawler::fetcher::Fetcher;
use crate::url::{is_on_domain, netloc, normalize_url};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Upper bound on sitemap documents fetched per discovery
pub const MAX_SITEMAP_DOCUMENTS: usize = 16;

/// Upper bound on page URLs returned per discovery
pub const MAX_SITEMAP_URLS: usize = 50_000;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: each `<loc>` names another sitemap
    Index(Vec<String>),

    /// `<urlset>`: each `<loc>` names a page
    UrlSet(Vec<String>),
}

/// Classifies a sitemap body and pulls out its `<loc>` values
pub fn parse_sitemap(xml: &str) -> SitemapDocument {
    let locs = extract_loc_values(xml);
    if xml.contains("<sitemapindex") {
        SitemapDocument::Index(locs)
    } else {
        SitemapDocument::UrlSet(locs)
    }
}

/// Returns the trimmed, unescaped text of every `<loc>` element in order
///
/// # Example
///
/// ```
/// use article_crawler::crawler::extract_loc_values;
///
/// let xml = "<urlset><url><loc> https://example.com/a?x=1&amp;y=2 </loc></url></urlset>";
/// assert_eq!(extract_loc_values(xml), vec!["https://example.com/a?x=1&y=2"]);
/// ```
pub fn extract_loc_values(xml: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0usize;

    while let Some(open_idx) = xml[start..].find("<loc>") {
        let open = start + open_idx + "<loc>".len();
        let Some(close_rel) = xml[open..].find("</loc>") else {
            break;
        };
        let close = open + close_rel;

        let mut value = xml[open..close].trim();
        if let Some(inner) = value
            .strip_prefix("<![CDATA[")
            .and_then(|v| v.strip_suffix("]]>"))
        {
            value = inner.trim();
        }

        if !value.is_empty() {
            out.push(unescape_xml(value));
        }
        start = close + "</loc>".len();
    }

    out
}

fn unescape_xml(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Extracts the URLs of `Sitemap:` directives from a robots.txt body
pub fn robots_sitemap_lines(robots_txt: &str) -> Vec<String> {
    robots_txt
        .lines()
        .map(str::trim)
        .filter(|line| line.to_ascii_lowercase().starts_with("sitemap:"))
        .filter_map(|line| line.split_once(':'))
        .map(|(_, rhs)| rhs.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

/// Discovers same-site page URLs for `target` from its sitemaps
///
/// Sources are tried in order: the target itself when it already points at
/// an `.xml` document, `<origin>/sitemap.xml`, then the `Sitemap:` lines of
/// `<origin>/robots.txt`. Sitemap indexes are followed breadth-first until
/// [`MAX_SITEMAP_DOCUMENTS`] sitemap fetches have been attempted, failed
/// ones included. Page URLs are normalized, deduplicated, restricted to the
/// target's netloc, and returned in document order. Fetch failures only shrink the result.
pub async fn discover_sitemap_urls(fetcher: &Fetcher, target: &Url) -> Vec<String> {
    let Some(base_domain) = netloc(target) else {
        return Vec::new();
    };
    let origin = target.origin().ascii_serialization();

    let mut sources = VecDeque::new();
    if target.path().ends_with(".xml") {
        sources.push_back(target.to_string());
    }
    sources.push_back(format!("{origin}/sitemap.xml"));

    let robots_url = format!("{origin}/robots.txt");
    match fetcher.fetch(&robots_url).await {
        Ok(page) => sources.extend(robots_sitemap_lines(&page.body)),
        Err(failure) => tracing::debug!("No robots.txt at {}: {}", robots_url, failure),
    }

    let mut seen_documents = HashSet::new();
    let mut seen_pages = HashSet::new();
    let mut pages = Vec::new();
    let mut documents_tried = 0;
    let mut documents_read = 0;

    while let Some(source) = sources.pop_front() {
        if documents_tried >= MAX_SITEMAP_DOCUMENTS || pages.len() >= MAX_SITEMAP_URLS {
            break;
        }
        if !seen_documents.insert(source.clone()) {
            continue;
        }

        documents_tried += 1;
        let page = match fetcher.fetch(&source).await {
            Ok(page) => page,
            Err(failure) => {
                tracing::debug!("Skipping sitemap {}: {}", source, failure);
                continue;
            }
        };
        documents_read += 1;

        match parse_sitemap(&page.body) {
            SitemapDocument::Index(children) => {
                tracing::debug!("Sitemap index {} lists {} sitemaps", source, children.len());
                sources.extend(children);
            }
            SitemapDocument::UrlSet(locs) => {
                tracing::debug!("Sitemap {} lists {} URLs", source, locs.len());
                for loc in locs {
                    let Ok(url) = normalize_url(&loc) else {
                        continue;
                    };
                    if !is_on_domain(&url, &base_domain) {
                        continue;
                    }
                    let url = String::from(url);
                    if seen_pages.insert(url.clone()) {
                        pages.push(url);
                        if pages.len() >= MAX_SITEMAP_URLS {
                            break;
                        }
                    }
                }
            }
        }
    }

    tracing::info!(
        "Sitemap discovery for {} found {} URLs in {} documents",
        target,
        pages.len(),
        documents_read
    );
    pages
}
