use crate::UrlError;
use url::Url;

/// Normalizes an absolute URL string into a crawl URL
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https` schemes
/// 3. Require a host
/// 4. Remove fragment (everything after #)
///
/// Scheme and host lowercasing plus dot-segment removal come from the
/// `url` crate's own parsing. Paths, trailing slashes and query strings are
/// otherwise kept as the site wrote them, since the store keys rows on the
/// exact URL.
///
/// # Examples
///
/// ```
/// use article_crawler::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Resolves an `href` against the page that referenced it
///
/// Returns None for empty hrefs, fragment-only hrefs, and anything that does
/// not resolve to an absolute `http(s)` URL with a host (`javascript:`,
/// `mailto:`, `tel:`, `data:` and similar).
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let joined = base_url.join(href).ok()?;
    normalize_parsed(joined).ok()
}

fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    url.set_fragment(None);

    Ok(url)
}
