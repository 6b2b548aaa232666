//! Statistics generation from the crawl database
//!
//! This module provides functionality for extracting and displaying
//! per-platform crawl statistics from the storage layer.

use crate::model::{Platform, SearchWindow};
use crate::storage::Storage;
use crate::TidemarkError;
use chrono::NaiveDate;

/// Per-platform statistics
#[derive(Debug, Clone)]
pub struct PlatformStats {
    /// The platform these numbers describe
    pub platform: Platform,

    /// Number of stored results
    pub stored: u64,

    /// Most recent publish date among stored results
    pub latest_publish: Option<NaiveDate>,

    /// The window the progress cursor last recorded, if any
    pub last_window: Option<SearchWindow>,
}

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// One entry per known platform, in declaration order
    pub per_platform: Vec<PlatformStats>,

    /// Total stored results across all platforms
    pub total_results: u64,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Successfully loaded statistics
/// * `Err(TidemarkError)` - Failed to query statistics
pub fn load_stats(storage: &dyn Storage) -> Result<CrawlStats, TidemarkError> {
    let mut per_platform = Vec::new();

    for platform in Platform::ALL {
        let stored = storage.count_results(platform)?;
        let latest_publish = storage.latest_publish_date(platform)?;
        let last_window = storage
            .read_cursor(platform)?
            .map(|c| SearchWindow::new(c.last_search_start, c.last_search_end));

        per_platform.push(PlatformStats {
            platform,
            stored,
            latest_publish,
            last_window,
        });
    }

    let total_results = storage.count_all_results()?;

    Ok(CrawlStats {
        per_platform,
        total_results,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_stats(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    for entry in &stats.per_platform {
        println!("{}:", entry.platform);
        println!("  Stored results: {}", entry.stored);
        match entry.latest_publish {
            Some(date) => println!("  Latest publish date: {}", date),
            None => println!("  Latest publish date: (none)"),
        }
        match &entry.last_window {
            Some(window) => println!("  Last window searched: {}", window),
            None => println!("  Last window searched: (never)"),
        }
        println!();
    }

    println!("Total results: {}", stats.total_results);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParsedResult;
    use crate::storage::SqliteStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_crawl_stats_creation() {
        let stats = CrawlStats {
            per_platform: vec![PlatformStats {
                platform: Platform::PChome,
                stored: 42,
                latest_publish: Some(date(2021, 2, 20)),
                last_window: Some(SearchWindow::new(date(2020, 12, 31), date(2021, 3, 1))),
            }],
            total_results: 42,
        };

        assert_eq!(stats.total_results, 42);
        assert_eq!(stats.per_platform[0].stored, 42);
    }

    #[test]
    fn test_load_stats_from_empty_storage() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let stats = load_stats(&storage).unwrap();

        assert_eq!(stats.total_results, 0);
        assert_eq!(stats.per_platform.len(), Platform::ALL.len());
        for entry in &stats.per_platform {
            assert_eq!(entry.stored, 0);
            assert!(entry.latest_publish.is_none());
            assert!(entry.last_window.is_none());
        }
    }

    #[test]
    fn test_load_stats_reflects_storage() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        for (url, publish) in [
            ("https://example.com/1", date(2021, 1, 5)),
            ("https://example.com/2", date(2021, 2, 20)),
        ] {
            storage
                .insert_result(&ParsedResult {
                    platform: Platform::PChome,
                    title: "pchome 開箱".to_string(),
                    article_url: url.to_string(),
                    content: "內容".to_string(),
                    publish_date: publish,
                })
                .unwrap();
        }
        storage
            .write_cursor(
                Platform::PChome,
                &SearchWindow::new(date(2020, 12, 31), date(2021, 3, 1)),
            )
            .unwrap();

        let stats = load_stats(&storage).unwrap();
        let pchome = stats
            .per_platform
            .iter()
            .find(|s| s.platform == Platform::PChome)
            .unwrap();

        assert_eq!(pchome.stored, 2);
        assert_eq!(pchome.latest_publish, Some(date(2021, 2, 20)));
        assert_eq!(
            pchome.last_window,
            Some(SearchWindow::new(date(2020, 12, 31), date(2021, 3, 1)))
        );
        assert_eq!(stats.total_results, 2);
    }
}
