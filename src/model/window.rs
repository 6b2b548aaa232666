//! Search window arithmetic
//!
//! Windows are half-open calendar intervals `[start, end)`. The end of a
//! window is always the first day of a month, produced by adding the window
//! span to the start's month number and carrying overflow into the year.
//! This is plain integer month arithmetic, so a window that starts on
//! 2020-12-31 with a three-month span ends on 2021-03-01, not 2021-03-31.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// A half-open calendar interval `[start, end)` scanned in one platform pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    /// Inclusive lower bound
    pub start: NaiveDate,

    /// Exclusive upper bound
    pub end: NaiveDate,
}

impl SearchWindow {
    /// Creates a window from its bounds
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Half-open membership test: `start` is inside, `end` is not
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

impl fmt::Display for SearchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Returns the first day of the month `months` after `date`'s month
///
/// Carries month overflow into the year, normalizing the month back into
/// 1..=12 (a normalized month of zero means December of the prior carry
/// year). For any `months >= 1` the result is strictly after `date`.
///
/// Returns None only if the resulting year falls outside chrono's range.
pub fn advance_month_floor(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let mut month = date.month() + months;
    let mut year = date.year();
    if month > 12 {
        year += (month / 12) as i32;
        month %= 12;
        if month == 0 {
            month = 12;
            year -= 1;
        }
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Returns the last day of the calendar month before `today`'s month
///
/// January collapses to December 31 of the previous year. The result is
/// strictly before `today`, even when `today` is the first of a month.
pub fn previous_month_end(today: NaiveDate) -> Option<NaiveDate> {
    if today.month() == 1 {
        NaiveDate::from_ymd_opt(today.year() - 1, 12, 31)
    } else {
        let month = today.month() - 1;
        NaiveDate::from_ymd_opt(today.year(), month, days_in_month(today.year(), month))
    }
}

/// Number of days in the given month (1..=12) of the given year
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}
