//! Table definitions for the article store

/// SQLite schema for the local store
pub const SQLITE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS scraped_articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT UNIQUE NOT NULL,
    title TEXT,
    content TEXT,
    scraped_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    source_domain TEXT,
    status TEXT NOT NULL DEFAULT 'active'
);

CREATE INDEX IF NOT EXISTS idx_scraped_articles_domain ON scraped_articles(source_domain);
"#;

/// Postgres DDL for the remote store (run once in the Supabase SQL editor)
pub const POSTGRES_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS scraped_articles (
    id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
    url TEXT UNIQUE NOT NULL,
    title TEXT,
    content TEXT,
    scraped_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
    source_domain TEXT,
    status TEXT DEFAULT 'active'
);
"#;

/// Initializes the SQLite schema
///
/// Safe to call on an existing database.
pub fn initialize_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SQLITE_SCHEMA_SQL)
}

/// Returns the Postgres DDL with the table renamed
pub fn postgres_schema_for(table: &str) -> String {
    POSTGRES_SCHEMA_SQL.replace("scraped_articles", table)
}
