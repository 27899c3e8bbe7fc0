//! Sink trait and error types
//!
//! A sink is the capability the crawler needs from a table store: upsert one
//! article keyed on its URL.

use crate::storage::ArticleRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while writing to a sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Write rejected with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Trait for article store implementations
///
/// The crawler runs on a single thread, so implementations need not be
/// `Send` or `Sync`.
#[async_trait(?Send)]
pub trait ArticleSink {
    /// Checks that the store is reachable before a run starts
    async fn verify(&self) -> SinkResult<()>;

    /// Inserts the record, or overwrites the row that has the same `url`
    async fn upsert(&mut self, record: &ArticleRecord) -> SinkResult<()>;

    /// Human readable description used in log lines
    fn describe(&self) -> String;
}

#[async_trait(?Send)]
impl<T: ArticleSink + ?Sized> ArticleSink for Box<T> {
    async fn verify(&self) -> SinkResult<()> {
        (**self).verify().await
    }

    async fn upsert(&mut self, record: &ArticleRecord) -> SinkResult<()> {
        (**self).upsert(record).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
