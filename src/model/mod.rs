//! Core domain types for the crawl
//!
//! # Components
//!
//! - `Platform`: the fixed set of commerce platforms the crawler tracks
//! - `SearchWindow`: a half-open calendar interval scanned in one pass, plus
//!   the month-floor arithmetic that produces consecutive windows
//! - `ParsedResult`: a dated, cleaned search result flowing from pagination
//!   to persistence and export

mod platform;
mod result;
mod window;

// Re-export main types
pub use platform::Platform;
pub use result::ParsedResult;
pub use window::{advance_month_floor, days_in_month, previous_month_end, SearchWindow};
