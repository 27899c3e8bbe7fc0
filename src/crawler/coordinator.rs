//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns the frontier, the fetcher, the classifier and the
//! sink, and drives the `Idle -> Running -> {Stopped, Drained}` lifecycle:
//! - `start` / `start_sitemap` verify the sink and seed the frontier
//! - `step` processes exactly one URL
//! - `run` loops over `step` with a polite delay until the frontier drains
//!   or the cancellation token fires
//!
//! No per-URL failure escapes a step. Fetch failures are logged and the page
//! is skipped; sink failures are logged and counted.

use crate::config::Config;
use crate::crawler::extract::{Classification, ContentExtractor};
use crate::crawler::fetcher::{FetchFailure, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::links::extract_links_from;
use crate::state::{CrawlState, RunContext};
use crate::storage::ArticleSink;
use crate::url::{matching_ignore_pattern, netloc, normalize_url};
use crate::{CrawlerError, Result, UrlError};
use scraper::Html;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Characters of an article title shown in the "Saved" log line
const LOG_TITLE_CHARS: usize = 40;

/// Pages between progress reports
const PROGRESS_INTERVAL: usize = 10;

/// Tunables the coordinator reads on every step
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Pause after every fetch attempt of a link-following crawl
    pub polite_delay: Duration,

    /// Pause after every fetch attempt of a sitemap sync
    pub sitemap_delay: Duration,

    /// Paragraph-character threshold for the article heuristic
    pub min_article_chars: usize,

    /// Substrings that exclude a sitemap URL from a sync
    pub ignore_patterns: Vec<String>,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for CrawlSettings {
    fn from(config: &Config) -> Self {
        Self {
            polite_delay: Duration::from_millis(config.crawler.polite_delay_ms),
            sitemap_delay: Duration::from_millis(config.sitemap.delay_ms),
            min_article_chars: config.crawler.min_article_chars,
            ignore_patterns: config.sitemap.ignore_patterns.clone(),
        }
    }
}

/// What one call to [`Coordinator::step`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing was pending
    Drained,

    /// The fetch failed; the page was skipped
    Skipped { url: String, failure: FetchFailure },

    /// The page was fetched and classified
    Processed { url: String, article: bool },
}

/// Main crawler coordinator structure
pub struct Coordinator<S> {
    fetcher: Fetcher,
    sink: S,
    extractor: ContentExtractor,
    frontier: Frontier,
    settings: CrawlSettings,
    base_domain: String,
    state: CrawlState,
    follow_links: bool,
    delay: Duration,
}

impl<S: ArticleSink> Coordinator<S> {
    /// Creates an idle coordinator
    pub fn new(fetcher: Fetcher, sink: S, settings: CrawlSettings) -> Self {
        Self {
            fetcher,
            sink,
            extractor: ContentExtractor::new(settings.min_article_chars),
            frontier: Frontier::default(),
            delay: settings.polite_delay,
            settings,
            base_domain: String::new(),
            state: CrawlState::Idle,
            follow_links: true,
        }
    }

    /// Starts a link-following crawl from `seed`
    ///
    /// The seed must be an absolute http(s) URL. The sink is verified before
    /// the state moves to `Running`; if verification fails the coordinator
    /// stays `Idle`.
    ///
    /// # Returns
    ///
    /// * `Ok(RunContext)` - Fresh counters and log for this run
    /// * `Err(CrawlerError)` - Bad seed, unreachable sink, or not idle
    pub async fn start(&mut self, seed: &str) -> Result<RunContext> {
        let seed = self.prepare(seed).await?;

        let mut ctx = RunContext::new();
        ctx.log(format!(
            "Starting crawl of {} into {}",
            seed,
            self.sink.describe()
        ));

        self.frontier = Frontier::seed(seed);
        self.follow_links = true;
        self.delay = self.settings.polite_delay;
        self.transition(CrawlState::Running)?;

        Ok(ctx)
    }

    /// Starts a sitemap sync over a flat URL list
    ///
    /// URLs are normalized like any crawled link; ones that fail to
    /// normalize or match an ignore pattern are logged and left out. Links
    /// found on the synced pages are not followed.
    pub async fn start_sitemap(&mut self, target: &str, urls: Vec<String>) -> Result<RunContext> {
        let target = self.prepare(target).await?;

        let mut ctx = RunContext::new();
        ctx.log(format!("Starting sitemap sync for {}", target));

        let mut kept = Vec::with_capacity(urls.len());
        for url in urls {
            if let Some(pattern) = matching_ignore_pattern(&url, &self.settings.ignore_patterns) {
                ctx.log(format!("Skipped (ignored by '{}'): {}", pattern, url));
                continue;
            }
            match normalize_url(&url) {
                Ok(normalized) => kept.push(String::from(normalized)),
                Err(e) => ctx.warn(format!("Skipped (invalid URL) {}: {}", url, e)),
            }
        }
        ctx.log(format!("Found {} URLs. Starting sync...", kept.len()));

        self.frontier = Frontier::from_urls(kept);
        self.follow_links = false;
        self.delay = self.settings.sitemap_delay;
        self.transition(CrawlState::Running)?;

        Ok(ctx)
    }

    /// Validates the starting URL and the sink ahead of the `Running` transition
    async fn prepare(&mut self, start_url: &str) -> Result<Url> {
        if !self.state.can_transition_to(CrawlState::Running) {
            return Err(CrawlerError::InvalidTransition {
                from: self.state,
                to: CrawlState::Running,
            });
        }

        let url = normalize_url(start_url)?;
        self.base_domain = netloc(&url).ok_or(UrlError::MissingDomain)?;

        self.sink.verify().await?;
        tracing::debug!("Sink {} is reachable", self.sink.describe());

        Ok(url)
    }

    /// Processes the next pending URL
    ///
    /// Fetch, then (when following links) extract and offer links, then
    /// classify and upsert an article. Links are queued even when the page
    /// is not an article.
    pub async fn step(&mut self, ctx: &mut RunContext) -> StepOutcome {
        let Some(url) = self.frontier.next() else {
            return StepOutcome::Drained;
        };
        ctx.log(format!("Crawling: {}", url));

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(failure) => {
                ctx.warn(format!("Error scraping {}: {}", url, failure));
                return StepOutcome::Skipped { url, failure };
            }
        };

        let page_url = match Url::parse(&url) {
            Ok(page_url) => page_url,
            Err(e) => {
                ctx.warn(format!("Error processing {}: {}", url, e));
                return StepOutcome::Processed {
                    url,
                    article: false,
                };
            }
        };

        let classification = {
            let document = Html::parse_document(&page.body);

            if self.follow_links {
                let links = extract_links_from(
                    &document,
                    &page_url,
                    &self.base_domain,
                    self.frontier.visited(),
                );
                let offered = self.frontier.offer(links);
                tracing::debug!(
                    "{}: queued {} priority and {} normal links",
                    url,
                    offered.priority_added,
                    offered.normal_added
                );
            }

            self.extractor.classify(&document, &page_url)
        };

        let record = match classification {
            Classification::Article(record) => record,
            Classification::NotArticle(reason) => {
                tracing::debug!("{} is not an article: {:?}", url, reason);
                return StepOutcome::Processed {
                    url,
                    article: false,
                };
            }
        };

        ctx.record_found();
        match self.sink.upsert(&record).await {
            Ok(()) => {
                ctx.record_added();
                let title: String = record.title.chars().take(LOG_TITLE_CHARS).collect();
                ctx.log(format!("Saved: {}...", title));
            }
            Err(e) => {
                ctx.record_error();
                ctx.warn(format!("DB Error for {}: {}", url, e));
            }
        }

        StepOutcome::Processed { url, article: true }
    }

    /// Runs steps until the frontier drains or `cancel` fires
    ///
    /// The token is checked once per iteration, so an in-flight fetch always
    /// completes. The polite delay follows every fetch attempt, failed ones
    /// included, and is cut short by cancellation. A non-200 response or a
    /// timeout does not skip the pause, so it costs the same as a success.
    pub async fn run(&mut self, mut ctx: RunContext, cancel: &CancellationToken) -> Result<RunContext> {
        if self.state != CrawlState::Running {
            return Err(CrawlerError::InvalidTransition {
                from: self.state,
                to: CrawlState::Running,
            });
        }

        let started = Instant::now();
        let mut pages = 0usize;

        let outcome = loop {
            if cancel.is_cancelled() {
                break CrawlState::Stopped;
            }

            if self.step(&mut ctx).await == StepOutcome::Drained {
                break CrawlState::Drained;
            }
            pages += 1;

            if pages % PROGRESS_INTERVAL == 0 {
                let rate = pages as f64 / started.elapsed().as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {} pages crawled, {} in queue, {} saved, {:.2} pages/sec",
                    pages,
                    self.frontier.pending_len(),
                    ctx.stats.added,
                    rate
                );
            }

            if !self.delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.delay) => {}
                }
            }
        };

        self.transition(outcome)?;

        let reason = match outcome {
            CrawlState::Stopped => "user stopped",
            _ => "queue empty",
        };
        let stats = ctx.stats;
        ctx.log(format!(
            "Crawler stopped ({}). Found: {}, saved: {}, errors: {}, visited: {}",
            reason,
            stats.found,
            stats.added,
            stats.errors,
            self.frontier.visited_len()
        ));

        Ok(ctx)
    }

    /// `start_sitemap` followed by `run`
    pub async fn run_sitemap(
        &mut self,
        target: &str,
        urls: Vec<String>,
        cancel: &CancellationToken,
    ) -> Result<RunContext> {
        let ctx = self.start_sitemap(target, urls).await?;
        self.run(ctx, cancel).await
    }

    fn transition(&mut self, to: CrawlState) -> Result<()> {
        if !self.state.can_transition_to(to) {
            return Err(CrawlerError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        tracing::debug!("Crawl state {} -> {}", self.state, to);
        self.state = to;
        Ok(())
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Netloc links must contain to be followed
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
