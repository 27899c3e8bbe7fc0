//! Storage module for persisting extracted articles
//!
//! This module handles:
//! - The `ArticleSink` capability the crawler writes through
//! - A Supabase/PostgREST sink for the remote table store
//! - A SQLite sink with the same schema for local runs and tests

mod rest;
mod schema;
mod sqlite;
mod traits;

pub use rest::{RestSink, CONFLICT_COLUMN};
pub use schema::{postgres_schema_for, POSTGRES_SCHEMA_SQL, SQLITE_SCHEMA_SQL};
pub use sqlite::SqliteSink;
pub use traits::{ArticleSink, SinkError, SinkResult};

use crate::config::{StoreBackend, StoreConfig};
use serde::Serialize;
use std::path::Path;

/// An article extracted from one page
///
/// Only the classifier builds these; `content` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    /// Unique key in the store
    pub url: String,
    pub title: String,
    pub content: String,
    pub source_domain: String,
}

/// A row read back from the SQLite store
#[derive(Debug, Clone)]
pub struct StoredArticle {
    pub id: i64,
    pub url: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub scraped_at: String,
    pub source_domain: Option<String>,
    pub status: String,
}

/// Opens the sink selected by the store configuration
///
/// # Returns
///
/// * `Ok(Box<dyn ArticleSink>)` - A sink ready for `verify`
/// * `Err(SinkError)` - The database could not be opened or the client built
pub fn open_sink(config: &StoreConfig) -> SinkResult<Box<dyn ArticleSink>> {
    match config.backend() {
        StoreBackend::Supabase => {
            let sink = RestSink::new(config.url.trim(), config.key.trim(), &config.table)?;
            Ok(Box::new(sink))
        }
        StoreBackend::Sqlite => {
            let sink = SqliteSink::open(Path::new(&config.database_path))?;
            Ok(Box::new(sink))
        }
    }
}
