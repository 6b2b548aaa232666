//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Deduplicated search result persistence
//! - Per-platform progress cursor tracking
//! - Counts and summaries for the stats mode

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::model::Platform;
use crate::TidemarkError;
use chrono::NaiveDate;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(TidemarkError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, TidemarkError> {
    SqliteStorage::new(path)
}

/// A stored search result row
#[derive(Debug, Clone)]
pub struct StoredResult {
    pub id: i64,
    pub platform: Platform,
    pub title: String,
    pub article_url: String,
    pub content: String,
    pub publish_date: NaiveDate,
    pub created_at: String,
}

/// The persisted progress cursor for one platform
///
/// At most one row exists per platform. The row is created by the first
/// cursor write and overwritten on every subsequent one; `last_search_end`
/// becomes the start of the next window.
#[derive(Debug, Clone)]
pub struct ProgressCursor {
    pub id: i64,
    pub platform: Platform,
    pub last_search_start: NaiveDate,
    pub last_search_end: NaiveDate,
    pub updated_at: String,
}
