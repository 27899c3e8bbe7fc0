//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the browser-like User-Agent and timeout
//! - Single-attempt GET requests (no retries)
//! - Classifying failures so the coordinator can log and move on

use crate::config::CrawlerConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// A page body retrieved with HTTP 200
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,

    /// URL after redirects
    pub final_url: String,

    /// Page body
    pub body: String,
}

/// Why a fetch produced no page
///
/// Every variant is non-fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read body: {0}")]
    Body(String),
}

/// Result of a fetch operation
pub type FetchResult = Result<FetchedPage, FetchFailure>;

/// Builds an HTTP client with the given User-Agent and request timeout
///
/// Redirects are followed with reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use article_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("Mozilla/5.0", Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrieves raw HTML for crawl URLs
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher from an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a fetcher using the crawler configuration's User-Agent and timeout
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(client))
    }

    /// Fetches a URL once
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 200 | `Ok(FetchedPage)` |
    /// | Any other status | `Failed(Status)` |
    /// | Timeout | `Failed(Timeout)` |
    /// | Connection refused / DNS / TLS | `Failed(Connect)` |
    /// | Body read error | `Failed(Body)` |
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let response = self.client.get(url).send().await.map_err(classify_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchFailure::Timeout
            } else {
                FetchFailure::Body(e.to_string())
            }
        })?;

        Ok(FetchedPage {
            url: url.to_string(),
            final_url,
            body,
        })
    }
}

fn classify_error(e: reqwest::Error) -> FetchFailure {
    if e.is_timeout() {
        FetchFailure::Timeout
    } else if e.is_connect() {
        FetchFailure::Connect(e.to_string())
    } else {
        FetchFailure::Request(e.to_string())
    }
}
