//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a browser-like User-Agent and no retries
//! - Link extraction with priority classification
//! - The frontier queue and visited set
//! - Article classification and content extraction
//! - Sitemap discovery as an alternate seeder
//! - Overall crawl coordination

mod coordinator;
mod extract;
mod fetcher;
mod frontier;
mod links;
mod sitemap;

pub use coordinator::{Coordinator, CrawlSettings, StepOutcome};
pub use extract::{
    classify_and_extract, element_text, extract_title, paragraph_text_len, Classification,
    ContentExtractor, NotArticle, CONTENT_CANDIDATES, DEFAULT_MIN_ARTICLE_CHARS, NO_TITLE,
};
pub use fetcher::{build_http_client, FetchFailure, FetchResult, FetchedPage, Fetcher};
pub use frontier::{Frontier, OfferOutcome};
pub use links::{extract_links, extract_links_from, is_priority_anchor, ExtractedLinks, PRIORITY_KEYWORDS};
pub use sitemap::{
    discover_sitemap_urls, extract_loc_values, parse_sitemap, robots_sitemap_lines,
    SitemapDocument, MAX_SITEMAP_DOCUMENTS, MAX_SITEMAP_URLS,
};

use crate::config::Config;
use crate::state::{CrawlState, RunContext};
use crate::storage::open_sink;
use crate::{normalize_url, Result};
use tokio_util::sync::CancellationToken;

/// Everything a finished run leaves behind
#[derive(Debug, Clone)]
pub struct RunReport {
    /// `Stopped` or `Drained`
    pub state: CrawlState,

    /// URLs dequeued during the run
    pub visited: usize,

    /// URLs still waiting when the run ended
    pub pending: usize,

    pub context: RunContext,
}

impl RunReport {
    fn from_coordinator<S>(coordinator: &Coordinator<S>, context: RunContext) -> Self
    where
        S: crate::storage::ArticleSink,
    {
        Self {
            state: coordinator.state(),
            visited: coordinator.frontier().visited_len(),
            pending: coordinator.frontier().pending_len(),
            context,
        }
    }
}

/// Runs a complete link-following crawl
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open and verify the configured sink
/// 2. Build the HTTP client
/// 3. Seed the frontier with the target URL
/// 4. Fetch, classify and store pages until drained or cancelled
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
/// * `cancel` - Stop signal, checked once per page
///
/// # Returns
///
/// * `Ok(RunReport)` - The run reached `Stopped` or `Drained`
/// * `Err(CrawlerError)` - The run could not start
pub async fn crawl(config: &Config, cancel: &CancellationToken) -> Result<RunReport> {
    let fetcher = Fetcher::from_config(&config.crawler)?;
    let sink = open_sink(&config.store)?;
    let mut coordinator = Coordinator::new(fetcher, sink, CrawlSettings::from(config));

    let ctx = coordinator.start(&config.target.url).await?;
    let ctx = coordinator.run(ctx, cancel).await?;

    Ok(RunReport::from_coordinator(&coordinator, ctx))
}

/// Discovers the target's sitemap URLs and syncs each page once
///
/// Links on synced pages are not followed. URLs matching the configured
/// ignore patterns are skipped.
pub async fn sync_sitemap(config: &Config, cancel: &CancellationToken) -> Result<RunReport> {
    let fetcher = Fetcher::from_config(&config.crawler)?;
    let target = normalize_url(&config.target.url)?;

    tracing::info!("Scanning sitemap for {}", target);
    let urls = discover_sitemap_urls(&fetcher, &target).await;
    if urls.is_empty() {
        tracing::warn!("No URLs found in sitemap for {}", target);
    }

    let sink = open_sink(&config.store)?;
    let mut coordinator = Coordinator::new(fetcher, sink, CrawlSettings::from(config));
    let ctx = coordinator
        .run_sitemap(&config.target.url, urls, cancel)
        .await?;

    Ok(RunReport::from_coordinator(&coordinator, ctx))
}
