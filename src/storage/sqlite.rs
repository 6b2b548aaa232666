//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::model::{ParsedResult, Platform, SearchWindow};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{ProgressCursor, StoredResult};
use crate::TidemarkError;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;

/// Storage format for day-granular date columns
const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(TidemarkError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, TidemarkError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
            PRAGMA mmap_size = 268435456;
        ",
        )?;

        // Initialize schema
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, TidemarkError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    // ===== Progress Cursors =====

    fn read_cursor(&self, platform: Platform) -> StorageResult<Option<ProgressCursor>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, last_search_start, last_search_end, updated_at
             FROM search_progress WHERE platform = ?1",
        )?;

        let row = stmt
            .query_row(params![platform.as_str()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .optional()?;

        let Some((id, start, end, updated_at)) = row else {
            return Ok(None);
        };

        let malformed = |field: &str, value: &str| StorageError::MalformedCursor {
            platform: platform.to_string(),
            message: format!("{} is not a date: '{}'", field, value),
        };

        let last_search_start =
            parse_date(&start).ok_or_else(|| malformed("last_search_start", &start))?;
        let last_search_end =
            parse_date(&end).ok_or_else(|| malformed("last_search_end", &end))?;

        Ok(Some(ProgressCursor {
            id,
            platform,
            last_search_start,
            last_search_end,
            updated_at,
        }))
    }

    fn write_cursor(&mut self, platform: Platform, window: &SearchWindow) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO search_progress (platform, last_search_start, last_search_end, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(platform) DO UPDATE SET
                 last_search_start = excluded.last_search_start,
                 last_search_end = excluded.last_search_end,
                 updated_at = excluded.updated_at",
            params![
                platform.as_str(),
                format_date(window.start),
                format_date(window.end),
                now
            ],
        )?;
        Ok(())
    }

    fn reset_cursor(&mut self, platform: Platform) -> StorageResult<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM search_progress WHERE platform = ?1",
            params![platform.as_str()],
        )?;
        Ok(deleted > 0)
    }

    fn all_cursors(&self) -> StorageResult<Vec<ProgressCursor>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, platform, last_search_start, last_search_end, updated_at
             FROM search_progress ORDER BY platform",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut cursors = Vec::new();
        for row in rows {
            let (id, platform_str, start, end, updated_at) = row?;

            let malformed = |message: String| StorageError::MalformedCursor {
                platform: platform_str.clone(),
                message,
            };

            let platform = Platform::from_db_string(&platform_str)
                .ok_or_else(|| malformed(format!("unknown platform '{}'", platform_str)))?;
            let last_search_start = parse_date(&start)
                .ok_or_else(|| malformed(format!("last_search_start is not a date: '{}'", start)))?;
            let last_search_end = parse_date(&end)
                .ok_or_else(|| malformed(format!("last_search_end is not a date: '{}'", end)))?;

            cursors.push(ProgressCursor {
                id,
                platform,
                last_search_start,
                last_search_end,
                updated_at,
            });
        }

        Ok(cursors)
    }

    // ===== Search Results =====

    fn insert_result(&mut self, result: &ParsedResult) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO search_results
             (platform, title, article_url, content, publish_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                result.platform.as_str(),
                result.title,
                result.article_url,
                result.content,
                format_date(result.publish_date),
                now
            ],
        )?;
        Ok(inserted > 0)
    }

    fn result_exists(&self, article_url: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM search_results WHERE article_url = ?1",
                params![article_url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn filter_new_urls(&self, urls: &[&str]) -> StorageResult<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM search_results WHERE article_url = ?1")?;

        let mut fresh = HashSet::new();
        for url in urls {
            let known: Option<i64> = stmt
                .query_row(params![url], |row| row.get(0))
                .optional()?;
            if known.is_none() {
                fresh.insert((*url).to_string());
            }
        }
        Ok(fresh)
    }

    fn results_for_platform(&self, platform: Platform) -> StorageResult<Vec<StoredResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, article_url, content, publish_date, created_at
             FROM search_results WHERE platform = ?1
             ORDER BY publish_date DESC, id ASC",
        )?;

        let rows = stmt.query_map(params![platform.as_str()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut results = Vec::new();
        for row in rows {
            let (id, title, article_url, content, date_str, created_at) = row?;
            let publish_date = parse_date(&date_str).ok_or_else(|| {
                StorageError::MalformedRow(format!(
                    "publish_date is not a date for {}: '{}'",
                    article_url, date_str
                ))
            })?;

            results.push(StoredResult {
                id,
                platform,
                title,
                article_url,
                content,
                publish_date,
                created_at,
            });
        }

        Ok(results)
    }

    // ===== Statistics =====

    fn count_results(&self, platform: Platform) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM search_results WHERE platform = ?1",
            params![platform.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_all_results(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM search_results", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn latest_publish_date(&self, platform: Platform) -> StorageResult<Option<NaiveDate>> {
        // MAX over the ISO date strings sorts correctly
        let latest: Option<String> = self.conn.query_row(
            "SELECT MAX(publish_date) FROM search_results WHERE platform = ?1",
            params![platform.as_str()],
            |row| row.get(0),
        )?;

        match latest {
            None => Ok(None),
            Some(s) => {
                let date = parse_date(&s).ok_or_else(|| {
                    StorageError::MalformedRow(format!("publish_date is not a date: '{}'", s))
                })?;
                Ok(Some(date))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_result(platform: Platform, url: &str, publish: NaiveDate) -> ParsedResult {
        ParsedResult {
            platform,
            title: format!("{} 開箱", platform.keyword()),
            article_url: url.to_string(),
            content: "測試內容".to_string(),
            publish_date: publish,
        }
    }

    #[test]
    fn test_read_cursor_when_none_exists() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let cursor = storage.read_cursor(Platform::PChome).unwrap();
        assert!(cursor.is_none());
    }

    #[test]
    fn test_cursor_roundtrip() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let window = SearchWindow::new(date(2020, 12, 31), date(2021, 3, 1));

        storage.write_cursor(Platform::PChome, &window).unwrap();

        let cursor = storage.read_cursor(Platform::PChome).unwrap().unwrap();
        assert_eq!(cursor.platform, Platform::PChome);
        assert_eq!(cursor.last_search_start, date(2020, 12, 31));
        assert_eq!(cursor.last_search_end, date(2021, 3, 1));
    }

    #[test]
    fn test_write_cursor_overwrites_single_row() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        storage
            .write_cursor(
                Platform::Momo,
                &SearchWindow::new(date(2020, 12, 31), date(2021, 3, 1)),
            )
            .unwrap();
        storage
            .write_cursor(
                Platform::Momo,
                &SearchWindow::new(date(2021, 3, 1), date(2021, 6, 1)),
            )
            .unwrap();

        let cursors = storage.all_cursors().unwrap();
        assert_eq!(cursors.len(), 1);
        assert_eq!(cursors[0].last_search_start, date(2021, 3, 1));
        assert_eq!(cursors[0].last_search_end, date(2021, 6, 1));
    }

    #[test]
    fn test_cursors_are_per_platform() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        storage
            .write_cursor(
                Platform::PChome,
                &SearchWindow::new(date(2020, 12, 31), date(2021, 3, 1)),
            )
            .unwrap();
        storage
            .write_cursor(
                Platform::Momo,
                &SearchWindow::new(date(2021, 3, 1), date(2021, 6, 1)),
            )
            .unwrap();

        let pchome = storage.read_cursor(Platform::PChome).unwrap().unwrap();
        let momo = storage.read_cursor(Platform::Momo).unwrap().unwrap();
        assert_eq!(pchome.last_search_end, date(2021, 3, 1));
        assert_eq!(momo.last_search_end, date(2021, 6, 1));
    }

    #[test]
    fn test_reset_cursor() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .write_cursor(
                Platform::PChome,
                &SearchWindow::new(date(2020, 12, 31), date(2021, 3, 1)),
            )
            .unwrap();

        assert!(storage.reset_cursor(Platform::PChome).unwrap());
        assert!(storage.read_cursor(Platform::PChome).unwrap().is_none());
        // Second reset has nothing to delete
        assert!(!storage.reset_cursor(Platform::PChome).unwrap());
    }

    #[test]
    fn test_malformed_cursor_is_reported() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .conn
            .execute(
                "INSERT INTO search_progress
                 (platform, last_search_start, last_search_end, updated_at)
                 VALUES ('PChome', 'garbage', '2021-03-01', 'now')",
                [],
            )
            .unwrap();

        let err = storage.read_cursor(Platform::PChome).unwrap_err();
        assert!(matches!(err, StorageError::MalformedCursor { .. }));
    }

    #[test]
    fn test_insert_result_and_duplicate() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let result = sample_result(Platform::PChome, "https://example.com/a", date(2021, 1, 5));

        assert!(storage.insert_result(&result).unwrap());
        // Same URL again is a benign no-op
        assert!(!storage.insert_result(&result).unwrap());
        assert_eq!(storage.count_all_results().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_url_across_platforms_still_ignored() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = sample_result(Platform::PChome, "https://example.com/a", date(2021, 1, 5));
        let second = sample_result(Platform::Momo, "https://example.com/a", date(2021, 1, 6));

        assert!(storage.insert_result(&first).unwrap());
        assert!(!storage.insert_result(&second).unwrap());
        assert_eq!(storage.count_results(Platform::PChome).unwrap(), 1);
        assert_eq!(storage.count_results(Platform::Momo).unwrap(), 0);
    }

    #[test]
    fn test_result_exists() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let result = sample_result(Platform::Momo, "https://example.com/b", date(2021, 2, 1));

        assert!(!storage.result_exists("https://example.com/b").unwrap());
        storage.insert_result(&result).unwrap();
        assert!(storage.result_exists("https://example.com/b").unwrap());
    }

    #[test]
    fn test_filter_new_urls() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .insert_result(&sample_result(
                Platform::PChome,
                "https://example.com/known",
                date(2021, 1, 5),
            ))
            .unwrap();

        let fresh = storage
            .filter_new_urls(&["https://example.com/known", "https://example.com/new"])
            .unwrap();

        assert_eq!(fresh.len(), 1);
        assert!(fresh.contains("https://example.com/new"));
    }

    #[test]
    fn test_results_for_platform_newest_first() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        for (url, d) in [
            ("https://example.com/1", date(2021, 1, 5)),
            ("https://example.com/2", date(2021, 2, 20)),
            ("https://example.com/3", date(2021, 1, 30)),
        ] {
            storage
                .insert_result(&sample_result(Platform::PChome, url, d))
                .unwrap();
        }
        storage
            .insert_result(&sample_result(
                Platform::Momo,
                "https://example.com/other",
                date(2021, 3, 1),
            ))
            .unwrap();

        let results = storage.results_for_platform(Platform::PChome).unwrap();
        let dates: Vec<NaiveDate> = results.iter().map(|r| r.publish_date).collect();
        assert_eq!(dates, vec![date(2021, 2, 20), date(2021, 1, 30), date(2021, 1, 5)]);
    }

    #[test]
    fn test_latest_publish_date() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert_eq!(storage.latest_publish_date(Platform::PChome).unwrap(), None);

        storage
            .insert_result(&sample_result(
                Platform::PChome,
                "https://example.com/1",
                date(2021, 1, 5),
            ))
            .unwrap();
        storage
            .insert_result(&sample_result(
                Platform::PChome,
                "https://example.com/2",
                date(2021, 2, 20),
            ))
            .unwrap();

        assert_eq!(
            storage.latest_publish_date(Platform::PChome).unwrap(),
            Some(date(2021, 2, 20))
        );
    }
}
