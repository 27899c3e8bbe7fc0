//! SQLite sink implementation
//!
//! Stores articles in a local database file with the same columns as the
//! remote table, so offline runs and tests exercise the same upsert contract.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ArticleSink, SinkError, SinkResult};
use crate::storage::{ArticleRecord, StoredArticle};
use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::{Path, PathBuf};

/// SQLite article store
pub struct SqliteSink {
    conn: Connection,
    location: Option<PathBuf>,
}

impl SqliteSink {
    /// Opens (or creates) the database file and initializes the schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Successfully opened/created database
    /// * `Err(SinkError)` - Failed to open database
    pub fn open(path: &Path) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            location: Some(path.to_path_buf()),
        })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            location: None,
        })
    }

    /// Gets a stored article by URL
    pub fn get(&self, url: &str) -> SinkResult<Option<StoredArticle>> {
        let article = self
            .conn
            .query_row(
                "SELECT id, url, title, content, scraped_at, source_domain, status
                 FROM scraped_articles WHERE url = ?1",
                params![url],
                |row| {
                    Ok(StoredArticle {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        title: row.get(2)?,
                        content: row.get(3)?,
                        scraped_at: row.get(4)?,
                        source_domain: row.get(5)?,
                        status: row.get(6)?,
                    })
                },
            )
            .optional()?;

        Ok(article)
    }

    /// Counts stored articles
    pub fn count(&self) -> SinkResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM scraped_articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Lists stored URLs in insertion order
    pub fn urls(&self) -> SinkResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM scraped_articles ORDER BY id")?;
        let urls = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(urls)
    }
}

#[async_trait(?Send)]
impl ArticleSink for SqliteSink {
    async fn verify(&self) -> SinkResult<()> {
        self.conn
            .query_row("SELECT COUNT(*) FROM scraped_articles", [], |row| {
                row.get::<_, i64>(0)
            })?;
        Ok(())
    }

    async fn upsert(&mut self, record: &ArticleRecord) -> SinkResult<()> {
        // scraped_at keeps the first-seen time; the other columns follow the latest fetch
        self.conn
            .execute(
                "INSERT INTO scraped_articles (url, title, content, source_domain)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(url) DO UPDATE SET
                    title = excluded.title,
                    content = excluded.content,
                    source_domain = excluded.source_domain",
                params![
                    record.url,
                    record.title,
                    record.content,
                    record.source_domain
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(code, message)
                    if code.code == ErrorCode::ConstraintViolation =>
                {
                    SinkError::ConstraintViolation(
                        message.unwrap_or_else(|| code.to_string()),
                    )
                }
                other => SinkError::Sqlite(other),
            })?;

        Ok(())
    }

    fn describe(&self) -> String {
        match &self.location {
            Some(path) => format!("sqlite:{}", path.display()),
            None => "sqlite::memory:".to_string(),
        }
    }
}
