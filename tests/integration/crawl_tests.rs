//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end against an in-memory SQLite sink.

use article_crawler::config::{Config, StoreBackend};
use article_crawler::crawler::{
    build_http_client, crawl, discover_sitemap_urls, Coordinator, CrawlSettings, FetchFailure,
    Fetcher, StepOutcome, MAX_SITEMAP_DOCUMENTS,
};
use article_crawler::state::CrawlState;
use article_crawler::storage::{ArticleRecord, ArticleSink, RestSink, SinkError, SinkResult, SqliteSink};
use article_crawler::CrawlerError;
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_fetcher() -> Fetcher {
    let client = build_http_client("TestBot/1.0", Duration::from_secs(5)).unwrap();
    Fetcher::new(client)
}

/// Settings with no delays so runs finish immediately
fn test_settings() -> CrawlSettings {
    CrawlSettings {
        polite_delay: Duration::ZERO,
        sitemap_delay: Duration::ZERO,
        min_article_chars: 500,
        ignore_patterns: vec![],
    }
}

fn coordinator() -> Coordinator<SqliteSink> {
    let sink = SqliteSink::open_in_memory().unwrap();
    Coordinator::new(test_fetcher(), sink, test_settings())
}

fn paragraphs(count: usize, chars_each: usize) -> String {
    (0..count)
        .map(|i| {
            let letter = (b'a' + i as u8) as char;
            format!("<p>{}</p>", letter.to_string().repeat(chars_each))
        })
        .collect()
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    )
}

async fn mount_page(server: &MockServer, at: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Sink whose writes always fail
struct FailingSink;

#[async_trait(?Send)]
impl ArticleSink for FailingSink {
    async fn verify(&self) -> SinkResult<()> {
        Ok(())
    }

    async fn upsert(&mut self, _record: &ArticleRecord) -> SinkResult<()> {
        Err(SinkError::Rejected {
            status: 500,
            detail: "database unavailable".to_string(),
        })
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

/// Sink that cannot be reached
struct UnreachableSink;

#[async_trait(?Send)]
impl ArticleSink for UnreachableSink {
    async fn verify(&self) -> SinkResult<()> {
        Err(SinkError::Connection("connection refused".to_string()))
    }

    async fn upsert(&mut self, _record: &ArticleRecord) -> SinkResult<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        "unreachable".to_string()
    }
}

#[tokio::test]
async fn test_hub_page_is_article_and_queues_priority_link() {
    let server = MockServer::start().await;
    let base = server.uri();

    let body = format!(
        r#"{}<a href="/weeks">See all weeks</a><a href="/login/privacy">Privacy</a>"#,
        paragraphs(3, 200)
    );
    mount_page(&server, "/hub", page("Pregnancy hub", &body)).await;

    let mut coordinator = coordinator();
    let hub = format!("{}/hub", base);
    let mut ctx = coordinator.start(&hub).await.unwrap();

    let outcome = coordinator.step(&mut ctx).await;
    assert_eq!(
        outcome,
        StepOutcome::Processed {
            url: hub.clone(),
            article: true
        }
    );

    let weeks = format!("{}/weeks", base);
    let privacy = format!("{}/login/privacy", base);
    assert_eq!(coordinator.frontier().peek_front(), Some(weeks.as_str()));
    assert!(!coordinator.frontier().is_pending(&privacy));
    assert_eq!(coordinator.frontier().pending_len(), 1);

    assert_eq!(ctx.stats.found, 1);
    assert_eq!(ctx.stats.added, 1);
    assert_eq!(ctx.stats.errors, 0);

    let stored = coordinator.sink().get(&hub).unwrap().unwrap();
    assert_eq!(stored.title.as_deref(), Some("Pregnancy hub"));
    assert_eq!(stored.status, "active");

    let domain = Url::parse(&base).unwrap();
    let expected_domain = format!(
        "{}:{}",
        domain.host_str().unwrap(),
        domain.port().unwrap()
    );
    assert_eq!(stored.source_domain.as_deref(), Some(expected_domain.as_str()));

    let content = stored.content.unwrap();
    assert!(content.contains(&"a".repeat(200)));
    assert!(content.contains(&"c".repeat(200)));
}

#[tokio::test]
async fn test_http_404_skips_page_without_side_effects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(page(
            "Not found",
            &format!(r#"{}<a href="/elsewhere">Elsewhere</a>"#, paragraphs(3, 200)),
        )))
        .mount(&server)
        .await;

    let mut coordinator = coordinator();
    let missing = format!("{}/missing", server.uri());
    let mut ctx = coordinator.start(&missing).await.unwrap();

    let outcome = coordinator.step(&mut ctx).await;
    assert_eq!(
        outcome,
        StepOutcome::Skipped {
            url: missing.clone(),
            failure: FetchFailure::Status(404)
        }
    );

    assert_eq!(ctx.stats, Default::default());
    assert_eq!(coordinator.frontier().pending_len(), 0);
    assert!(coordinator.frontier().is_visited(&missing));
    assert_eq!(coordinator.sink().count().unwrap(), 0);

    assert_eq!(coordinator.step(&mut ctx).await, StepOutcome::Drained);
}

#[tokio::test]
async fn test_run_drains_frontier() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Navigation page: too little paragraph text to be an article
    mount_page(
        &server,
        "/hub",
        page(
            "Hub",
            r#"<p>Short intro</p><a href="/about">About us</a><a href="/weeks">Week by week</a>"#,
        ),
    )
    .await;
    mount_page(
        &server,
        "/weeks",
        page(
            "Week by week",
            &format!(r#"<article>{}</article><a href="/hub">Home</a>"#, paragraphs(2, 300)),
        ),
    )
    .await;
    // /about is unmounted and answers 404

    let mut coordinator = coordinator();
    let ctx = coordinator.start(&format!("{}/hub", base)).await.unwrap();
    let ctx = coordinator.run(ctx, &CancellationToken::new()).await.unwrap();

    assert_eq!(coordinator.state(), CrawlState::Drained);
    assert_eq!(coordinator.frontier().visited_len(), 3);
    assert_eq!(ctx.stats.found, 1);
    assert_eq!(ctx.stats.added, 1);
    assert_eq!(ctx.stats.errors, 0);
    assert_eq!(coordinator.sink().count().unwrap(), 1);

    // The priority link is crawled before the earlier normal link
    let crawled: Vec<&str> = ctx
        .log
        .entries()
        .filter(|line| line.contains("Crawling: "))
        .collect();
    assert_eq!(crawled.len(), 3);
    assert!(crawled[1].ends_with("/weeks"));
    assert!(crawled[2].ends_with("/about"));

    let last = ctx.log.entries().last().unwrap();
    assert!(last.contains("queue empty"));
    assert!(last.contains("saved: 1"));
}

#[tokio::test]
async fn test_stop_between_steps() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        page(
            "Home",
            r#"<a href="/one">One</a><a href="/two">Two</a>"#,
        ),
    )
    .await;

    let mut coordinator = coordinator();
    let mut ctx = coordinator.start(&base).await.unwrap();
    coordinator.step(&mut ctx).await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let ctx = coordinator.run(ctx, &cancel).await.unwrap();

    assert_eq!(coordinator.state(), CrawlState::Stopped);
    assert_eq!(coordinator.frontier().visited_len(), 1);
    assert_eq!(coordinator.frontier().pending_len(), 2);
    assert!(ctx.log.entries().last().unwrap().contains("user stopped"));

    // Terminal states do not restart
    let result = coordinator.start(&base).await;
    assert!(matches!(
        result,
        Err(CrawlerError::InvalidTransition {
            from: CrawlState::Stopped,
            ..
        })
    ));
}

#[tokio::test]
async fn test_sink_failures_are_counted_and_run_continues() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/a",
        page(
            "First",
            &format!(r#"{}<a href="/b">Next</a>"#, paragraphs(3, 200)),
        ),
    )
    .await;
    mount_page(&server, "/b", page("Second", &paragraphs(3, 200))).await;

    let mut coordinator = Coordinator::new(test_fetcher(), FailingSink, test_settings());
    let ctx = coordinator.start(&format!("{}/a", base)).await.unwrap();
    let ctx = coordinator.run(ctx, &CancellationToken::new()).await.unwrap();

    assert_eq!(coordinator.state(), CrawlState::Drained);
    assert_eq!(ctx.stats.found, 2);
    assert_eq!(ctx.stats.added, 0);
    assert_eq!(ctx.stats.errors, 2);
    assert!(ctx.log.entries().any(|line| line.contains("database unavailable")));
}

#[tokio::test]
async fn test_unreachable_sink_blocks_start() {
    let mut coordinator = Coordinator::new(test_fetcher(), UnreachableSink, test_settings());
    let result = coordinator.start("https://example.com/").await;

    assert!(matches!(result, Err(CrawlerError::Sink(SinkError::Connection(_)))));
    assert_eq!(coordinator.state(), CrawlState::Idle);
}

#[tokio::test]
async fn test_self_link_is_not_revisited() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/article",
        page(
            "Article",
            &format!(r#"{}<a href="/article">Self</a>"#, paragraphs(3, 200)),
        ),
    )
    .await;

    let mut coordinator = coordinator();
    let article = format!("{}/article", base);
    let ctx = coordinator.start(&article).await.unwrap();
    let ctx = coordinator.run(ctx, &CancellationToken::new()).await.unwrap();

    assert_eq!(ctx.stats.added, 1);
    assert_eq!(coordinator.frontier().visited_len(), 1);
    assert_eq!(coordinator.sink().urls().unwrap(), vec![article]);
}

#[tokio::test]
async fn test_crawl_with_sqlite_config() {
    let server = MockServer::start().await;
    mount_page(&server, "/weeks", page("Weeks", &paragraphs(2, 300))).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("articles.db");

    let mut config = Config::default();
    config.target.url = format!("{}/weeks", server.uri());
    config.crawler.polite_delay_ms = 0;
    config.store.backend = Some(StoreBackend::Sqlite);
    config.store.database_path = db_path.to_string_lossy().to_string();

    let report = crawl(&config, &CancellationToken::new()).await.unwrap();
    assert_eq!(report.state, CrawlState::Drained);
    assert_eq!(report.visited, 1);
    assert_eq!(report.pending, 0);
    assert_eq!(report.context.stats.added, 1);

    let sink = SqliteSink::open(&db_path).unwrap();
    assert_eq!(sink.count().unwrap(), 1);
}

#[tokio::test]
async fn test_rest_sink_upsert_request() {
    let server = MockServer::start().await;

    let record = ArticleRecord {
        url: "https://example.com/a".to_string(),
        title: "Title".to_string(),
        content: "Body".to_string(),
        source_domain: "example.com".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/rest/v1/scraped_articles"))
        .and(query_param("on_conflict", "url"))
        .and(header("apikey", "secret"))
        .and(header("authorization", "Bearer secret"))
        .and(header_exists("prefer"))
        .and(body_json(serde_json::json!([{
            "url": "https://example.com/a",
            "title": "Title",
            "content": "Body",
            "source_domain": "example.com"
        }])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut sink = RestSink::new(&server.uri(), "secret", "scraped_articles").unwrap();
    sink.upsert(&record).await.unwrap();
}

#[tokio::test]
async fn test_rest_sink_rejected_write() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/scraped_articles"))
        .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
        .mount(&server)
        .await;

    let mut sink = RestSink::new(&server.uri(), "secret", "scraped_articles").unwrap();
    let record = ArticleRecord {
        url: "https://example.com/a".to_string(),
        title: "Title".to_string(),
        content: "Body".to_string(),
        source_domain: "example.com".to_string(),
    };

    match sink.upsert(&record).await {
        Err(SinkError::Rejected { status, detail }) => {
            assert_eq!(status, 409);
            assert_eq!(detail, "conflict");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rest_sink_verify() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/scraped_articles"))
        .and(query_param("select", "url"))
        .and(header("apikey", "good"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/scraped_articles"))
        .and(header("apikey", "bad"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let good = RestSink::new(&server.uri(), "good", "scraped_articles").unwrap();
    assert!(good.verify().await.is_ok());

    let bad = RestSink::new(&server.uri(), "bad", "scraped_articles").unwrap();
    assert!(matches!(
        bad.verify().await,
        Err(SinkError::Rejected { status: 401, .. })
    ));
}

#[tokio::test]
async fn test_sitemap_discovery_follows_index_and_robots() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/robots.txt",
        format!("User-agent: *\nSitemap: {}/sitemap-index.xml\n", base),
    )
    .await;
    mount_page(
        &server,
        "/sitemap.xml",
        format!(
            r#"<urlset><url><loc>{base}/a</loc></url><url><loc>{base}/b#top</loc></url><url><loc>https://other.com/x</loc></url></urlset>"#
        ),
    )
    .await;
    mount_page(
        &server,
        "/sitemap-index.xml",
        format!(r#"<sitemapindex><sitemap><loc>{base}/sitemap-posts.xml</loc></sitemap></sitemapindex>"#),
    )
    .await;
    mount_page(
        &server,
        "/sitemap-posts.xml",
        format!(r#"<urlset><url><loc>{base}/c</loc></url><url><loc>{base}/a</loc></url></urlset>"#),
    )
    .await;

    let target = Url::parse(&base).unwrap();
    let urls = discover_sitemap_urls(&test_fetcher(), &target).await;

    assert_eq!(
        urls,
        vec![
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/c", base)
        ]
    );
}

#[tokio::test]
async fn test_sitemap_discovery_without_sitemaps() {
    let server = MockServer::start().await;
    let target = Url::parse(&server.uri()).unwrap();
    let urls = discover_sitemap_urls(&test_fetcher(), &target).await;
    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_sitemap_discovery_caps_failed_documents() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Index whose children are all unmounted and answer 404
    let children: String = (0..200)
        .map(|i| format!("<sitemap><loc>{base}/missing-{i}.xml</loc></sitemap>"))
        .collect();
    mount_page(
        &server,
        "/sitemap.xml",
        format!("<sitemapindex>{children}</sitemapindex>"),
    )
    .await;

    let target = Url::parse(&base).unwrap();
    let urls = discover_sitemap_urls(&test_fetcher(), &target).await;
    assert!(urls.is_empty());

    // robots.txt plus at most MAX_SITEMAP_DOCUMENTS sitemap fetches
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1 + MAX_SITEMAP_DOCUMENTS);
}

#[tokio::test]
async fn test_sitemap_sync_skips_ignored_and_does_not_follow_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/a",
        page(
            "Article A",
            &format!(r#"{}<a href="/c">See all topics</a>"#, paragraphs(3, 200)),
        ),
    )
    .await;
    mount_page(&server, "/b", page("Listing", "<p>Too short</p>")).await;

    let settings = CrawlSettings {
        ignore_patterns: vec!["/tag/".to_string()],
        ..test_settings()
    };
    let sink = SqliteSink::open_in_memory().unwrap();
    let mut coordinator = Coordinator::new(test_fetcher(), sink, settings);

    let urls = vec![
        format!("{}/a", base),
        format!("{}/tag/news", base),
        format!("{}/b", base),
    ];
    let ctx = coordinator
        .run_sitemap(&base, urls, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(coordinator.state(), CrawlState::Drained);
    assert_eq!(coordinator.frontier().visited_len(), 2);
    assert!(!coordinator.frontier().is_visited(&format!("{}/c", base)));
    assert!(!coordinator.frontier().is_visited(&format!("{}/tag/news", base)));
    assert_eq!(ctx.stats.found, 1);
    assert_eq!(ctx.stats.added, 1);
    assert!(ctx
        .log
        .entries()
        .any(|line| line.contains("Skipped (ignored by '/tag/')")));
}

#[tokio::test]
async fn test_fetcher_reports_status_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = test_fetcher()
        .fetch(&format!("{}/error", server.uri()))
        .await;
    assert_eq!(result.unwrap_err(), FetchFailure::Status(500));
}

#[tokio::test]
async fn test_fetcher_reports_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = build_http_client("TestBot/1.0", Duration::from_millis(200)).unwrap();
    let result = Fetcher::new(client)
        .fetch(&format!("{}/slow", server.uri()))
        .await;
    assert_eq!(result.unwrap_err(), FetchFailure::Timeout);
}

#[tokio::test]
async fn test_fetcher_returns_body_on_200() {
    let server = MockServer::start().await;
    mount_page(&server, "/ok", page("OK", "<p>hello</p>")).await;

    let url = format!("{}/ok", server.uri());
    let fetched = test_fetcher().fetch(&url).await.unwrap();
    assert_eq!(fetched.url, url);
    assert_eq!(fetched.final_url, url);
    assert!(fetched.body.contains("<p>hello</p>"));
}
