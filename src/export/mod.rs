//! Export module for CSV files and crawl statistics
//!
//! This module handles:
//! - Merging scanned results into per-platform CSV files
//! - Regenerating CSV files from the database
//! - Loading and displaying crawl statistics

mod csv;
pub mod stats;

pub use self::csv::{
    export_file_name, merge_records, merge_to_csv, read_csv, write_csv, ExportError,
    ExportRecord, ExportResult,
};
pub use stats::{load_stats, print_stats, CrawlStats, PlatformStats};
