//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Tidemark database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Deduplicated search results, one row per article URL
CREATE TABLE IF NOT EXISTS search_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    platform TEXT NOT NULL,
    title TEXT NOT NULL,
    article_url TEXT NOT NULL UNIQUE,
    content TEXT NOT NULL,
    publish_date TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_search_results_platform ON search_results(platform);
CREATE INDEX IF NOT EXISTS idx_search_results_publish_date ON search_results(publish_date);

-- Per-platform window cursor, at most one row per platform
CREATE TABLE IF NOT EXISTS search_progress (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    platform TEXT NOT NULL UNIQUE,
    last_search_start TEXT NOT NULL,
    last_search_end TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// Every statement is `IF NOT EXISTS`, so this is safe to run on every
/// open.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
