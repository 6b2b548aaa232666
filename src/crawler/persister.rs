//! Persistence of scanned batches
//!
//! This module composes the storage writes and the CSV export for one
//! scanned batch. Both paths apply the same relevance gate: a result only
//! lands if its lowercased title contains the platform keyword, regardless
//! of any advisory filtering that happened during pagination.

use crate::config::ExportConfig;
use crate::export::{export_file_name, merge_to_csv, ExportRecord};
use crate::model::{ParsedResult, Platform};
use crate::storage::Storage;
use crate::TidemarkError;
use std::path::PathBuf;
use tracing::debug;

/// Writes scanned results to storage and the per-platform CSV file
pub struct Persister {
    export_dir: PathBuf,
}

impl Persister {
    /// Creates a persister from the export configuration
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            export_dir: PathBuf::from(&config.directory),
        }
    }

    /// Inserts relevant results into storage
    ///
    /// Unique-key conflicts are benign no-ops; connection or statement
    /// failures propagate.
    ///
    /// # Arguments
    ///
    /// * `storage` - Storage backend to write into
    /// * `results` - The scanned batch
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of rows actually inserted
    /// * `Err(TidemarkError)` - A write failed
    pub fn save(
        &self,
        storage: &mut dyn Storage,
        results: &[ParsedResult],
    ) -> Result<usize, TidemarkError> {
        let mut inserted = 0;
        for result in results.iter().filter(|r| Self::is_relevant(r)) {
            if storage.insert_result(result)? {
                inserted += 1;
            } else {
                debug!(url = %result.article_url, "Already stored, insert ignored");
            }
        }
        Ok(inserted)
    }

    /// Merges relevant results into the platform's CSV file
    ///
    /// # Arguments
    ///
    /// * `results` - The scanned batch
    /// * `platform` - The platform whose file receives the batch
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Total row count of the rewritten file
    /// * `Err(TidemarkError)` - The merge or rewrite failed
    pub fn export(
        &self,
        results: &[ParsedResult],
        platform: Platform,
    ) -> Result<usize, TidemarkError> {
        let fresh: Vec<ExportRecord> = results
            .iter()
            .filter(|r| Self::is_relevant(r))
            .map(ExportRecord::from)
            .collect();

        let path = self.export_dir.join(export_file_name(platform));
        let merged = merge_to_csv(&path, &fresh)?;
        Ok(merged)
    }

    /// Relevance gate: the platform keyword must appear in the title
    fn is_relevant(result: &ParsedResult) -> bool {
        result
            .title
            .to_lowercase()
            .contains(result.platform.keyword())
    }
}
