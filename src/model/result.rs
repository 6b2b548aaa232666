use crate::model::Platform;
use chrono::NaiveDate;

/// A search result with cleaned fields and a resolved publish date
///
/// Raw items whose snippet carries no recognizable date stamp never become
/// a `ParsedResult`; they are dropped during pagination. Everything that
/// reaches persistence or export is therefore fully dated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResult {
    pub platform: Platform,

    /// Title with the source site's boilerplate suffix removed
    pub title: String,

    /// Link target; the dedup key across all runs
    pub article_url: String,

    /// Snippet text with date-stamp furniture removed
    pub content: String,

    pub publish_date: NaiveDate,
}
