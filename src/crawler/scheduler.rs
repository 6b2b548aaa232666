//! Scheduler for per-platform search windows
//!
//! This module handles:
//! - Computing the next calendar window a platform should scan
//! - Clamping windows that would reach past the present
//! - Advancing the progress cursor after a scan
//!
//! Reading and advancing are split deliberately: `next_window` never writes,
//! so a scan that dies half-way leaves the cursor exactly where it was, and
//! the orchestrator decides when (and whether) to commit the advance.

use crate::config::CrawlConfig;
use crate::model::{advance_month_floor, previous_month_end, Platform, SearchWindow};
use crate::storage::Storage;
use crate::TidemarkError;
use chrono::NaiveDate;
use tracing::debug;

/// Computes and advances per-platform search windows
pub struct WindowScheduler {
    /// Start of the very first window for a platform with no cursor
    floor_date: NaiveDate,

    /// Number of calendar months each window spans
    window_months: u32,
}

impl WindowScheduler {
    /// Creates a scheduler from the crawl configuration
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            floor_date: config.floor_date,
            window_months: config.window_months,
        }
    }

    /// Computes the next window for a platform without touching the cursor
    ///
    /// The window starts where the platform's cursor ends (or at the
    /// configured floor date for a platform never scanned before) and spans
    /// the configured number of months. A window that would reach past
    /// `today` is clamped to `[previous_month_end(today), today)`, which
    /// may overlap already-scanned ground but never leaves a gap; URL-level
    /// dedup absorbs the overlap.
    ///
    /// # Arguments
    ///
    /// * `storage` - Storage backend holding the progress cursor
    /// * `platform` - The platform to compute a window for
    /// * `today` - The current date, passed in so runs are reproducible
    ///
    /// # Returns
    ///
    /// * `Ok(SearchWindow)` - The window the next scan should cover
    /// * `Err(TidemarkError)` - Cursor read failure or calendar overflow
    pub fn next_window(
        &self,
        storage: &dyn Storage,
        platform: Platform,
        today: NaiveDate,
    ) -> Result<SearchWindow, TidemarkError> {
        let cursor = storage.read_cursor(platform)?;

        let start = match &cursor {
            Some(c) => c.last_search_end,
            None => self.floor_date,
        };

        let end = advance_month_floor(start, self.window_months).ok_or_else(|| {
            TidemarkError::Window(format!(
                "window end overflows the calendar: {} + {} months",
                start, self.window_months
            ))
        })?;

        if end > today {
            let clamped_start = previous_month_end(today).ok_or_else(|| {
                TidemarkError::Window(format!("no previous month end before {}", today))
            })?;
            let clamped = SearchWindow::new(clamped_start, today);
            debug!(%platform, window = %clamped, "Clamped window to the present");
            return Ok(clamped);
        }

        Ok(SearchWindow::new(start, end))
    }

    /// Records a scanned window as the platform's new cursor position
    ///
    /// Upserts the cursor row; the first advance for a platform creates it.
    ///
    /// # Arguments
    ///
    /// * `storage` - Storage backend holding the progress cursor
    /// * `platform` - The platform whose cursor moves
    /// * `window` - The window that was just scanned
    pub fn advance(
        &self,
        storage: &mut dyn Storage,
        platform: Platform,
        window: &SearchWindow,
    ) -> Result<(), TidemarkError> {
        storage.write_cursor(platform, window)?;
        debug!(%platform, %window, "Advanced progress cursor");
        Ok(())
    }
}
