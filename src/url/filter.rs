use crate::url::netloc;
use url::Url;

/// Substrings that mark a URL as non-content (account pages, search, media)
pub const JUNK_MARKERS: &[&str] = &[
    "login",
    "signup",
    "register",
    "search",
    "video",
    "advertisement",
];

/// Returns true if the lowercased URL contains any junk marker
pub fn is_junk(url: &str) -> bool {
    let lowered = url.to_lowercase();
    JUNK_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Returns true if the URL's netloc contains `base_domain` as a substring
///
/// The substring match lets `www.example.com` pass for a base of
/// `example.com` but also lets `example.com.evil.net` through.
pub fn is_on_domain(url: &Url, base_domain: &str) -> bool {
    match netloc(url) {
        Some(location) => !location.is_empty() && location.contains(base_domain),
        None => false,
    }
}

/// Checks whether a resolved URL may enter the frontier
///
/// # Examples
///
/// ```
/// use url::Url;
/// use article_crawler::url::is_valid_url;
///
/// let url = Url::parse("https://example.com/weeks").unwrap();
/// assert!(is_valid_url(&url, "example.com"));
///
/// let url = Url::parse("https://example.com/login/privacy").unwrap();
/// assert!(!is_valid_url(&url, "example.com"));
/// ```
pub fn is_valid_url(url: &Url, base_domain: &str) -> bool {
    is_on_domain(url, base_domain) && !is_junk(url.as_str())
}

/// Returns the first ignore pattern found in the URL, if any
pub fn matching_ignore_pattern<'a>(url: &str, patterns: &'a [String]) -> Option<&'a str> {
    patterns
        .iter()
        .map(String::as_str)
        .find(|pattern| !pattern.is_empty() && url.contains(pattern))
}
