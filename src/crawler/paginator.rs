//! Sequential pagination of one platform/window scan
//!
//! This module drives the page loop against the search API and converts raw
//! items into dated, in-window results:
//! - offsets start at 1 and step by the page size
//! - an empty page ends the scan early
//! - items already stored are skipped (advisory; the database unique index
//!   is the authoritative dedup)
//! - items without a parseable snippet date, or dated outside the window,
//!   are dropped and counted

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{FetchError, RawSearchItem, SearchClient};
use crate::model::{ParsedResult, Platform, SearchWindow};
use crate::snippet::{clean_content, clean_title, parse_publish_date};
use crate::storage::Storage;
use chrono::NaiveDate;
use tracing::debug;

/// Per-scan accounting alongside the kept results
#[derive(Debug, Default)]
pub struct PaginationOutcome {
    /// Kept results, sorted by publish date descending
    pub results: Vec<ParsedResult>,

    /// Pages requested, including a trailing empty one
    pub pages_fetched: u32,

    /// Raw items seen across all pages
    pub items_seen: u32,

    /// Items skipped because the URL was already stored
    pub skipped_known: u32,

    /// Items dropped because no publish date could be parsed
    pub dropped_undated: u32,

    /// Items dropped because their date fell outside the window
    pub dropped_outside: u32,
}

/// Builds the remote query text for a platform/window pair
pub fn build_query(platform: Platform, window: &SearchWindow) -> String {
    format!(
        "{} after:{} before:{}",
        platform.keyword(),
        window.start,
        window.end
    )
}

/// Drives sequential pagination for one platform scan
pub struct ResultPaginator<'a> {
    client: &'a SearchClient,
    page_size: u32,
    result_budget: u32,
}

impl<'a> ResultPaginator<'a> {
    /// Creates a paginator from the crawl configuration
    pub fn new(client: &'a SearchClient, config: &CrawlConfig) -> Self {
        Self {
            client,
            page_size: config.page_size,
            result_budget: config.result_budget,
        }
    }

    /// Scans one window for one platform
    ///
    /// # Arguments
    ///
    /// * `storage` - Storage backend for advisory dedup lookups
    /// * `platform` - The platform being scanned
    /// * `window` - The calendar window to cover
    /// * `today` - The current date, used to resolve relative snippet dates
    ///
    /// # Returns
    ///
    /// * `Ok(PaginationOutcome)` - Kept results plus accounting
    /// * `Err(FetchError)` - A page request failed; the scan is abandoned
    pub async fn collect(
        &self,
        storage: &dyn Storage,
        platform: Platform,
        window: &SearchWindow,
        today: NaiveDate,
    ) -> Result<PaginationOutcome, FetchError> {
        let query = build_query(platform, window);
        debug!(%platform, %window, query, "Starting windowed scan");

        let mut outcome = PaginationOutcome::default();
        let mut start_index: u32 = 1;

        loop {
            let items = self.client.fetch_page(&query, start_index).await?;
            outcome.pages_fetched += 1;

            if items.is_empty() {
                debug!(%platform, start_index, "Empty page, stopping pagination");
                break;
            }

            self.absorb_page(storage, platform, window, today, &items, &mut outcome);

            start_index += self.page_size;
            if outcome.results.len() as u32 >= self.result_budget
                || start_index > self.result_budget
            {
                break;
            }
        }

        // Newest first; equal dates keep page order
        outcome.results.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));

        Ok(outcome)
    }

    /// Runs one page of raw items through the keep/skip/drop pipeline
    fn absorb_page(
        &self,
        storage: &dyn Storage,
        platform: Platform,
        window: &SearchWindow,
        today: NaiveDate,
        items: &[RawSearchItem],
        outcome: &mut PaginationOutcome,
    ) {
        for item in items {
            outcome.items_seen += 1;

            let lowered = item.title.to_lowercase();
            if lowered.contains(platform.keyword()) && self.url_is_known(storage, &item.link) {
                outcome.skipped_known += 1;
                continue;
            }

            let Some(publish_date) = parse_publish_date(&item.snippet, today) else {
                outcome.dropped_undated += 1;
                debug!(%platform, url = %item.link, "No publish date in snippet, dropping");
                continue;
            };

            if !window.contains(publish_date) {
                outcome.dropped_outside += 1;
                debug!(
                    %platform,
                    url = %item.link,
                    %publish_date,
                    "Publish date outside window, dropping"
                );
                continue;
            }

            outcome.results.push(ParsedResult {
                platform,
                title: clean_title(&item.title),
                article_url: item.link.clone(),
                content: clean_content(&item.snippet),
                publish_date,
            });
        }
    }

    /// Advisory lookup: a storage failure degrades to "not known"
    fn url_is_known(&self, storage: &dyn Storage, url: &str) -> bool {
        match storage.result_exists(url) {
            Ok(known) => known,
            Err(e) => {
                debug!(url, error = %e, "Advisory dedup lookup failed, treating as new");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::storage::SqliteStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_client() -> SearchClient {
        SearchClient::new(&SearchConfig {
            api_key: "test-key".to_string(),
            engine_id: "test-engine".to_string(),
            endpoint: "http://127.0.0.1:0/customsearch/v1".to_string(),
        })
        .unwrap()
    }

    fn test_config() -> CrawlConfig {
        CrawlConfig {
            page_size: 10,
            result_budget: 100,
            window_months: 3,
            floor_date: date(2020, 12, 31),
            platforms: Platform::ALL.to_vec(),
            advance_on_fetch_error: true,
        }
    }

    fn item(title: &str, link: &str, snippet: &str) -> RawSearchItem {
        RawSearchItem {
            title: title.to_string(),
            link: link.to_string(),
            snippet: snippet.to_string(),
        }
    }

    fn window() -> SearchWindow {
        SearchWindow::new(date(2020, 12, 31), date(2021, 3, 1))
    }

    #[test]
    fn test_build_query() {
        assert_eq!(
            build_query(Platform::PChome, &window()),
            "pchome after:2020-12-31 before:2021-03-01"
        );
    }

    #[test]
    fn test_absorb_keeps_dated_in_window_items() {
        let client = test_client();
        let paginator = ResultPaginator::new(&client, &test_config());
        let storage = SqliteStorage::new_in_memory().unwrap();
        let mut outcome = PaginationOutcome::default();

        let items = vec![item(
            "在pchome買的鍵盤開箱 - 網路購物板 | Dcard",
            "https://www.dcard.tw/f/shopping/p/1",
            "Jan 5, 2021 ... 昨天下單今天就到了...",
        )];
        paginator.absorb_page(
            &storage,
            Platform::PChome,
            &window(),
            date(2021, 6, 1),
            &items,
            &mut outcome,
        );

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.items_seen, 1);
        let kept = &outcome.results[0];
        assert_eq!(kept.publish_date, date(2021, 1, 5));
        assert_eq!(kept.title, "在pchome買的鍵盤開箱");
        assert_eq!(kept.content, "昨天下單今天就到了");
    }

    #[test]
    fn test_absorb_drops_undated_items() {
        let client = test_client();
        let paginator = ResultPaginator::new(&client, &test_config());
        let storage = SqliteStorage::new_in_memory().unwrap();
        let mut outcome = PaginationOutcome::default();

        let items = vec![item(
            "pchome 退貨問題",
            "https://www.dcard.tw/f/shopping/p/2",
            "這篇完全沒有日期戳記",
        )];
        paginator.absorb_page(
            &storage,
            Platform::PChome,
            &window(),
            date(2021, 6, 1),
            &items,
            &mut outcome,
        );

        assert!(outcome.results.is_empty());
        assert_eq!(outcome.dropped_undated, 1);
    }

    #[test]
    fn test_absorb_drops_out_of_window_dates() {
        let client = test_client();
        let paginator = ResultPaginator::new(&client, &test_config());
        let storage = SqliteStorage::new_in_memory().unwrap();
        let mut outcome = PaginationOutcome::default();

        let items = vec![
            // Dated exactly window.end: dropped (half-open)
            item(
                "pchome 三月戰利品",
                "https://www.dcard.tw/f/shopping/p/3",
                "Mar 1, 2021 ... 內容",
            ),
            // Dated exactly window.start: kept
            item(
                "pchome 跨年戰利品",
                "https://www.dcard.tw/f/shopping/p/4",
                "Dec 31, 2020 ... 內容",
            ),
        ];
        paginator.absorb_page(
            &storage,
            Platform::PChome,
            &window(),
            date(2021, 6, 1),
            &items,
            &mut outcome,
        );

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.dropped_outside, 1);
        assert_eq!(outcome.results[0].publish_date, date(2020, 12, 31));
    }

    #[test]
    fn test_absorb_skips_known_urls_only_with_keyword() {
        let client = test_client();
        let paginator = ResultPaginator::new(&client, &test_config());
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        // Pre-store both URLs
        for url in ["https://www.dcard.tw/f/shopping/p/5", "https://www.dcard.tw/f/shopping/p/6"] {
            storage
                .insert_result(&ParsedResult {
                    platform: Platform::PChome,
                    title: "pchome 舊文".to_string(),
                    article_url: url.to_string(),
                    content: "內容".to_string(),
                    publish_date: date(2021, 1, 2),
                })
                .unwrap();
        }

        let mut outcome = PaginationOutcome::default();
        let items = vec![
            // Known URL and keyword in title: skipped before date parsing
            item(
                "pchome 開箱舊文",
                "https://www.dcard.tw/f/shopping/p/5",
                "Jan 10, 2021 ... 內容",
            ),
            // Known URL but no keyword in the title: falls through to the
            // date pipeline and is kept here
            item(
                "某平台 開箱舊文",
                "https://www.dcard.tw/f/shopping/p/6",
                "Jan 11, 2021 ... 內容",
            ),
        ];
        paginator.absorb_page(
            &storage,
            Platform::PChome,
            &window(),
            date(2021, 6, 1),
            &items,
            &mut outcome,
        );

        assert_eq!(outcome.skipped_known, 1);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].article_url, "https://www.dcard.tw/f/shopping/p/6");
    }

    #[test]
    fn test_absorb_keyword_match_is_case_insensitive() {
        let client = test_client();
        let paginator = ResultPaginator::new(&client, &test_config());
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .insert_result(&ParsedResult {
                platform: Platform::PChome,
                title: "pchome 舊文".to_string(),
                article_url: "https://www.dcard.tw/f/shopping/p/7".to_string(),
                content: "內容".to_string(),
                publish_date: date(2021, 1, 2),
            })
            .unwrap();

        let mut outcome = PaginationOutcome::default();
        let items = vec![item(
            "PChome 24h 出貨速度",
            "https://www.dcard.tw/f/shopping/p/7",
            "Jan 12, 2021 ... 內容",
        )];
        paginator.absorb_page(
            &storage,
            Platform::PChome,
            &window(),
            date(2021, 6, 1),
            &items,
            &mut outcome,
        );

        assert_eq!(outcome.skipped_known, 1);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_relative_dates_resolve_against_today() {
        let client = test_client();
        let paginator = ResultPaginator::new(&client, &test_config());
        let storage = SqliteStorage::new_in_memory().unwrap();
        let mut outcome = PaginationOutcome::default();
        let today = date(2021, 1, 10);

        let items = vec![item(
            "pchome 折扣碼分享",
            "https://www.dcard.tw/f/shopping/p/8",
            "3 days ago ... 內容",
        )];
        paginator.absorb_page(&storage, Platform::PChome, &window(), today, &items, &mut outcome);

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].publish_date, date(2021, 1, 7));
    }
}
