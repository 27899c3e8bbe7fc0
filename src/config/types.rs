use serde::Deserialize;

/// Browser-like User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Target used when neither the config file nor the environment names one
pub const DEFAULT_TARGET_URL: &str = "https://www.babycenter.com/pregnancy";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// The site to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Seed URL; its netloc bounds the crawl
    #[serde(default = "default_target_url")]
    pub url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: default_target_url(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Delay between loop iterations (milliseconds)
    #[serde(rename = "polite-delay-ms", default = "default_polite_delay_ms")]
    pub polite_delay_ms: u64,

    /// Paragraph text needed for a page to count as an article (characters)
    #[serde(rename = "min-article-chars", default = "default_min_article_chars")]
    pub min_article_chars: usize,

    /// User-Agent header value
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout_secs(),
            polite_delay_ms: default_polite_delay_ms(),
            min_article_chars: default_min_article_chars(),
            user_agent: default_user_agent(),
        }
    }
}

/// Which store receives the extracted articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Supabase / PostgREST table over HTTPS
    #[default]
    Supabase,
    /// Local SQLite database file
    Sqlite,
}

/// Store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Backend named in the file; `None` lets the environment decide
    #[serde(default)]
    pub backend: Option<StoreBackend>,

    /// Project URL of the remote store (e.g. https://xyz.supabase.co)
    #[serde(default)]
    pub url: String,

    /// Service key for the remote store
    #[serde(default)]
    pub key: String,

    /// Table holding the articles in the remote store
    #[serde(default = "default_table")]
    pub table: String,

    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: None,
            url: String::new(),
            key: String::new(),
            table: default_table(),
            database_path: default_database_path(),
        }
    }
}

impl StoreConfig {
    /// The backend in effect: the configured one, or Supabase
    pub fn backend(&self) -> StoreBackend {
        self.backend.unwrap_or_default()
    }
}

/// Sitemap sync configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapConfig {
    /// URLs containing any of these substrings are skipped
    #[serde(rename = "ignore-patterns", default)]
    pub ignore_patterns: Vec<String>,

    /// Delay between sitemap URLs (milliseconds)
    #[serde(rename = "delay-ms", default = "default_sitemap_delay_ms")]
    pub delay_ms: u64,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            delay_ms: default_sitemap_delay_ms(),
        }
    }
}

fn default_target_url() -> String {
    DEFAULT_TARGET_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_polite_delay_ms() -> u64 {
    500
}

fn default_min_article_chars() -> usize {
    500
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_table() -> String {
    "scraped_articles".to_string()
}

fn default_database_path() -> String {
    "./articles.db".to_string()
}

fn default_sitemap_delay_ms() -> u64 {
    1000
}
