//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::model::{ParsedResult, Platform, SearchWindow};
use crate::storage::{ProgressCursor, StoredResult};
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Malformed progress cursor for {platform}: {message}")]
    MalformedCursor { platform: String, message: String },

    #[error("Malformed stored row: {0}")]
    MalformedRow(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all database operations needed by the crawler. The
/// advisory lookups (`result_exists`, `filter_new_urls`) are cheap
/// pre-filters; the `UNIQUE` index on `article_url`, enforced inside
/// `insert_result`, is the authoritative dedup.
pub trait Storage {
    // ===== Progress Cursors =====

    /// Reads the progress cursor for a platform, if one exists
    ///
    /// Purely a read; never creates or modifies the row.
    fn read_cursor(&self, platform: Platform) -> StorageResult<Option<ProgressCursor>>;

    /// Upserts the progress cursor for a platform to the given window
    ///
    /// Creates the row on the platform's first write, overwrites it on
    /// every later one. The orchestrator decides when this commit happens.
    fn write_cursor(&mut self, platform: Platform, window: &SearchWindow) -> StorageResult<()>;

    /// Deletes the progress cursor for a platform
    ///
    /// The repair path for a damaged cursor: the next scan falls back to
    /// the configured floor date. Returns whether a row existed.
    fn reset_cursor(&mut self, platform: Platform) -> StorageResult<bool>;

    /// Reads all progress cursors, in platform order
    fn all_cursors(&self) -> StorageResult<Vec<ProgressCursor>>;

    // ===== Search Results =====

    /// Inserts a result row unless its URL is already stored
    ///
    /// Returns `Ok(true)` when a row was written, `Ok(false)` when the
    /// unique index on `article_url` made the insert a no-op. Real
    /// statement or connection failures surface as errors.
    fn insert_result(&mut self, result: &ParsedResult) -> StorageResult<bool>;

    /// Advisory check: is this URL already stored?
    fn result_exists(&self, article_url: &str) -> StorageResult<bool>;

    /// Advisory batch filter: the subset of `urls` not yet stored
    fn filter_new_urls(&self, urls: &[&str]) -> StorageResult<HashSet<String>>;

    /// All stored results for a platform, newest publish date first
    fn results_for_platform(&self, platform: Platform) -> StorageResult<Vec<StoredResult>>;

    // ===== Statistics =====

    /// Counts stored results for one platform
    fn count_results(&self, platform: Platform) -> StorageResult<u64>;

    /// Counts stored results across all platforms
    fn count_all_results(&self) -> StorageResult<u64>;

    /// Most recent publish date stored for a platform
    fn latest_publish_date(&self, platform: Platform) -> StorageResult<Option<NaiveDate>>;
}
