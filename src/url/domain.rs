use url::Url;

/// Returns the network location of a URL: the lowercase host plus the port
/// when one is given explicitly
///
/// Default ports are not part of the result, so `https://example.com:443/`
/// and `https://example.com/` share the netloc `example.com`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use article_crawler::url::netloc;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(netloc(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/hub").unwrap();
/// assert_eq!(netloc(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
