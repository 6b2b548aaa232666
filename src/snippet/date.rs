use chrono::{Days, NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Feb 5, 2021" style textual dates, anywhere in the snippet
    static ref ABSOLUTE_DATE: Regex = Regex::new(r"([A-Za-z]{3}\s+\d{1,2},\s+\d{4})").unwrap();

    // "4 days ago" / "1 day ago"
    static ref DAYS_AGO: Regex = Regex::new(r"(\d+)\s+days?\s+ago").unwrap();

    // "今天17:35"; the English spelling appears in some locales
    static ref TODAY_STAMP: Regex = Regex::new(r"(?:今天|Today)\s*(\d{1,2}):(\d{2})").unwrap();
}

/// A single date-extraction strategy over a raw snippet
///
/// Returns the extracted date, or None when the snippet doesn't carry this
/// matcher's stamp (or carries one that fails strict validation).
pub type DateMatcher = fn(&str, NaiveDate) -> Option<NaiveDate>;

/// The matcher list, in priority order
///
/// Absolute textual dates are checked first so they are never misread as
/// relative ones, then "N days ago", then the same-day clock stamp.
fn matchers() -> &'static [DateMatcher] {
    &[match_absolute_date, match_days_ago, match_today_stamp]
}

/// Recovers the publish date embedded in a search snippet
///
/// Folds the snippet through the ordered matcher list and returns the first
/// success. A snippet with no recognizable date stamp yields None; callers
/// drop such items rather than guessing.
///
/// `today` anchors the relative matchers; this function never reads the
/// clock itself.
pub fn parse_publish_date(snippet: &str, today: NaiveDate) -> Option<NaiveDate> {
    matchers().iter().find_map(|matcher| matcher(snippet, today))
}

/// Matches "Mon D, YYYY" textual dates, validated strictly
///
/// A regex hit whose month name or day number doesn't survive strict
/// parsing (e.g. "Feb 30, 2021") is treated as no match, letting the later
/// matchers have a look.
fn match_absolute_date(snippet: &str, _today: NaiveDate) -> Option<NaiveDate> {
    let caps = ABSOLUTE_DATE.captures(snippet)?;
    let text = caps.get(1)?.as_str();
    NaiveDate::parse_from_str(text, "%b %d, %Y").ok()
}

/// Matches "N days ago", resolved against `today`
fn match_days_ago(snippet: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = DAYS_AGO.captures(snippet)?;
    let days: u64 = caps.get(1)?.as_str().parse().ok()?;
    today.checked_sub_days(Days::new(days))
}

/// Matches the same-day "今天HH:MM" stamp
///
/// The clock digits only validate; stored dates are day-granular, so a
/// valid stamp resolves to `today` itself.
fn match_today_stamp(snippet: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = TODAY_STAMP.captures(snippet)?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0).map(|_| today)
}
