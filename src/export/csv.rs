//! CSV export with cross-run merging
//!
//! Exported files accumulate across runs: each export reads the prior file
//! (when present), unions it with the fresh batch deduplicated by article
//! URL, and rewrites the whole file. Prior rows win so that hand-edited or
//! previously exported rows are never clobbered by a rescan.

use crate::model::{ParsedResult, Platform};
use crate::storage::StoredResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during export operations
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// One row of an exported CSV file
///
/// `publish_date` serializes as `YYYY-MM-DD` via chrono's ISO support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub platform: String,
    pub title: String,
    pub article_url: String,
    pub content: String,
    pub publish_date: NaiveDate,
}

impl From<&ParsedResult> for ExportRecord {
    fn from(result: &ParsedResult) -> Self {
        Self {
            platform: result.platform.as_str().to_string(),
            title: result.title.clone(),
            article_url: result.article_url.clone(),
            content: result.content.clone(),
            publish_date: result.publish_date,
        }
    }
}

impl From<&StoredResult> for ExportRecord {
    fn from(result: &StoredResult) -> Self {
        Self {
            platform: result.platform.as_str().to_string(),
            title: result.title.clone(),
            article_url: result.article_url.clone(),
            content: result.content.clone(),
            publish_date: result.publish_date,
        }
    }
}

/// Returns the export file name for a platform
///
/// # Example
///
/// ```
/// use tidemark::model::Platform;
/// use tidemark::export::export_file_name;
///
/// assert_eq!(export_file_name(Platform::PChome), "pchome_search_results.csv");
/// ```
pub fn export_file_name(platform: Platform) -> String {
    format!("{}_search_results.csv", platform.keyword())
}

/// Reads all records from a CSV file
///
/// # Arguments
///
/// * `path` - Path to the CSV file
///
/// # Returns
///
/// * `Ok(Vec<ExportRecord>)` - Successfully read records (empty for an
///   empty file)
/// * `Err(ExportError)` - File missing, unreadable, or malformed
pub fn read_csv(path: &Path) -> ExportResult<Vec<ExportRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Writes records to a CSV file, replacing any existing content
///
/// Creates the parent directory if it does not exist.
pub fn write_csv(path: &Path, records: &[ExportRecord]) -> ExportResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Unions prior and fresh records, deduplicated by article URL
///
/// Prior rows keep their position and win conflicts; fresh rows with a URL
/// not yet present are appended in their given order.
pub fn merge_records(prior: Vec<ExportRecord>, fresh: &[ExportRecord]) -> Vec<ExportRecord> {
    let mut seen: HashSet<String> = prior.iter().map(|r| r.article_url.clone()).collect();
    let mut merged = prior;

    for record in fresh {
        if seen.insert(record.article_url.clone()) {
            merged.push(record.clone());
        }
    }

    merged
}

/// Merges fresh records into a CSV file and rewrites it
///
/// A missing, empty, or unreadable prior file degrades to an empty base
/// with a warning; the database remains the source of truth either way.
///
/// # Arguments
///
/// * `path` - Path to the CSV file
/// * `fresh` - Newly scanned records to merge in
///
/// # Returns
///
/// * `Ok(usize)` - Total row count of the rewritten file
/// * `Err(ExportError)` - Failed to write the merged file
pub fn merge_to_csv(path: &Path, fresh: &[ExportRecord]) -> ExportResult<usize> {
    let prior = if path.exists() {
        match read_csv(path) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read prior export, starting fresh");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let merged = merge_records(prior, fresh);
    write_csv(path, &merged)?;
    Ok(merged.len())
}
