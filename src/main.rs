//! Article Crawler main entry point
//!
//! This is the command-line interface for the single-site article harvester.

use article_crawler::config::{load_effective_config, Config, StoreBackend, StoreConfig};
use article_crawler::crawler::{crawl, sync_sitemap};
use article_crawler::output::print_summary;
use article_crawler::storage::{postgres_schema_for, SQLITE_SCHEMA_SQL};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Article Crawler: harvest articles from one website
///
/// Crawls the target site, classifies each page as an article or a
/// navigation page, and upserts the articles into a table store keyed by
/// URL. Press Ctrl-C to stop after the current page.
#[derive(Parser, Debug)]
#[command(name = "article-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A single-site article harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults plus environment when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL, overriding the config file and TARGET_URL
    #[arg(long, value_name = "URL")]
    target: Option<String>,

    /// Seed from the site's sitemaps instead of following links
    #[arg(long)]
    sitemap: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "print_schema")]
    dry_run: bool,

    /// Print the table DDL for the configured store and exit
    #[arg(long, conflicts_with = "dry_run")]
    print_schema: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if cli.print_schema {
        handle_print_schema(&cli);
        return Ok(());
    }

    // Load and validate configuration
    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No config file given, using defaults and environment"),
    }
    let config = match load_effective_config(cli.config.as_deref(), cli.target.as_deref()) {
        Ok((cfg, hash)) => {
            match hash {
                Some(hash) => tracing::info!("Configuration loaded successfully (hash: {})", hash),
                None => tracing::info!("Configuration loaded successfully"),
            }
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.sitemap);
        return Ok(());
    }

    handle_crawl(config, cli.sitemap).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("article_crawler=info,warn"),
            1 => EnvFilter::new("article_crawler=debug,info"),
            2 => EnvFilter::new("article_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --print-schema mode
///
/// Uses the table name from the effective configuration when it loads, and
/// the default table name otherwise.
fn handle_print_schema(cli: &Cli) {
    let store = match load_effective_config(cli.config.as_deref(), cli.target.as_deref()) {
        Ok((config, _)) => config.store,
        Err(e) => {
            tracing::debug!("Using default table name: {}", e);
            StoreConfig::default()
        }
    };

    match store.backend() {
        StoreBackend::Supabase => println!("{}", postgres_schema_for(&store.table).trim()),
        StoreBackend::Sqlite => println!("{}", SQLITE_SCHEMA_SQL.trim()),
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, sitemap: bool) {
    println!("=== Article Crawler Dry Run ===\n");

    println!("Target: {}", config.target.url);
    println!(
        "Mode: {}",
        if sitemap { "sitemap sync" } else { "link-following crawl" }
    );

    println!("\nCrawler Configuration:");
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Polite delay: {}ms", config.crawler.polite_delay_ms);
    println!("  Min article chars: {}", config.crawler.min_article_chars);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nStore:");
    match config.store.backend() {
        StoreBackend::Supabase => {
            println!("  Backend: supabase");
            println!("  URL: {}", config.store.url);
            println!("  Key: {}", mask_secret(&config.store.key));
            println!("  Table: {}", config.store.table);
        }
        StoreBackend::Sqlite => {
            println!("  Backend: sqlite");
            println!("  Database: {}", config.store.database_path);
        }
    }

    if sitemap {
        println!("\nSitemap:");
        println!("  Delay: {}ms", config.sitemap.delay_ms);
        println!(
            "  Ignore patterns ({}):",
            config.sitemap.ignore_patterns.len()
        );
        for pattern in &config.sitemap.ignore_patterns {
            println!("    - {}", pattern);
        }
    }

    println!("\n✓ Configuration is valid");
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}…", visible)
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, sitemap: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            interrupt.cancel();
        }
    });

    tracing::info!("Target: {}", config.target.url);

    let result = if sitemap {
        sync_sitemap(&config, &cancel).await
    } else {
        crawl(&config, &cancel).await
    };

    match result {
        Ok(report) => {
            tracing::info!("Crawl finished: {}", report.state);
            print_summary(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
