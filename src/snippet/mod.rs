//! Snippet parsing for search results
//!
//! The remote API returns a title, a link, and a short snippet per result.
//! This module turns those raw strings into clean article fields:
//!
//! - `clean_title`: strips the source site's boilerplate title suffix
//! - `clean_content`: strips the leading date stamp and trailing ellipsis
//!   the search engine embeds in snippets
//! - `parse_publish_date`: recovers the publish date from the snippet's
//!   date stamp via an ordered list of matchers
//!
//! Everything here is pure; callers pass "today" in explicitly.

mod clean;
mod date;

// Re-export main functions
pub use clean::{clean_content, clean_title};
pub use date::{parse_publish_date, DateMatcher};
