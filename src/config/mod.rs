//! Configuration module
//!
//! Configuration comes from an optional TOML file, a `.env` file and the
//! process environment, in that order of increasing precedence.
//!
//! # Example
//!
//! ```no_run
//! use article_crawler::config::load_effective_config;
//!
//! let (config, _hash) = load_effective_config(None, None).unwrap();
//! println!("Crawling {}", config.target.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, SitemapConfig, StoreBackend, StoreConfig, TargetConfig,
    DEFAULT_TARGET_URL, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{
    apply_overrides, load_effective_config, read_config_file,
    ENV_DATABASE_PATH, ENV_IGNORE_PATTERNS, ENV_SUPABASE_KEY, ENV_SUPABASE_URL, ENV_TARGET_URL,
};
pub use validation::validate;
