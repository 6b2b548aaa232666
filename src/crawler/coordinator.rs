//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the per-invocation flow that coordinates all aspects
//! of a crawl, including:
//! - Opening storage and building the search client
//! - Computing each platform's next window
//! - Paginating, persisting, and exporting one platform at a time
//! - Advancing progress cursors under the configured error policy

use crate::config::Config;
use crate::crawler::fetcher::SearchClient;
use crate::crawler::paginator::ResultPaginator;
use crate::crawler::persister::Persister;
use crate::crawler::scheduler::WindowScheduler;
use crate::model::{Platform, SearchWindow};
use crate::storage::{SqliteStorage, Storage};
use crate::TidemarkError;
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, error, info};

/// Accounting for one platform's scan
#[derive(Debug, Clone)]
pub struct PlatformReport {
    /// The platform that was scanned
    pub platform: Platform,

    /// The window the scan covered
    pub window: SearchWindow,

    /// Dated, in-window results the scan kept
    pub found: usize,

    /// Items skipped during pagination as already stored
    pub skipped_known: u32,

    /// Items dropped for lacking a parseable publish date
    pub dropped_undated: u32,

    /// Items dropped for falling outside the window
    pub dropped_outside: u32,

    /// Rows actually written to storage
    pub inserted: usize,

    /// Total row count of the rewritten CSV file (zero when export failed)
    pub exported: usize,
}

/// Outcome of one full invocation across all configured platforms
#[derive(Debug)]
pub struct RunSummary {
    /// Reports for platforms whose scan completed
    pub reports: Vec<PlatformReport>,

    /// Platforms whose scan failed; details are in the log
    pub failed_platforms: Vec<Platform>,
}

impl RunSummary {
    /// Whether every configured platform completed its scan
    pub fn all_succeeded(&self) -> bool {
        self.failed_platforms.is_empty()
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    storage: SqliteStorage,
    client: SearchClient,
    scheduler: WindowScheduler,
    persister: Persister,
}

impl Coordinator {
    /// Creates a new coordinator instance, opening storage at the
    /// configured database path
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully initialized
    /// * `Err(TidemarkError)` - Failed to open storage or build the client
    pub fn new(config: Config) -> Result<Self, TidemarkError> {
        let storage = SqliteStorage::new(Path::new(&config.storage.database_path))?;
        Self::with_storage(config, storage)
    }

    /// Creates a coordinator over an already-opened storage backend
    pub fn with_storage(config: Config, storage: SqliteStorage) -> Result<Self, TidemarkError> {
        let client = SearchClient::new(&config.search)?;
        let scheduler = WindowScheduler::new(&config.crawl);
        let persister = Persister::new(&config.export);

        Ok(Self {
            config,
            storage,
            client,
            scheduler,
            persister,
        })
    }

    /// Runs one scan cycle over all configured platforms
    ///
    /// Platforms are scanned sequentially in configuration order. A failed
    /// platform is logged and recorded in the summary; the remaining
    /// platforms still run.
    ///
    /// # Arguments
    ///
    /// * `today` - The current date, passed in so runs are reproducible
    pub async fn run(&mut self, today: NaiveDate) -> Result<RunSummary, TidemarkError> {
        let platforms = self.config.crawl.platforms.clone();
        info!(platforms = platforms.len(), %today, "Starting crawl");

        let mut reports = Vec::new();
        let mut failed_platforms = Vec::new();

        for platform in platforms {
            match self.scan_platform(platform, today).await {
                Ok(report) => {
                    info!(
                        platform = %report.platform,
                        window = %report.window,
                        found = report.found,
                        inserted = report.inserted,
                        exported = report.exported,
                        skipped_known = report.skipped_known,
                        dropped_undated = report.dropped_undated,
                        dropped_outside = report.dropped_outside,
                        "Platform scan complete"
                    );
                    reports.push(report);
                }
                Err(e) => {
                    error!(%platform, error = %e, "Platform scan failed");
                    failed_platforms.push(platform);
                }
            }
        }

        let total_inserted: usize = reports.iter().map(|r| r.inserted).sum();
        info!(
            scanned = reports.len(),
            failed = failed_platforms.len(),
            total_inserted,
            "Crawl finished"
        );

        Ok(RunSummary {
            reports,
            failed_platforms,
        })
    }

    /// Scans one platform's next window end to end
    ///
    /// Flow: compute the window, paginate, persist, export, advance.
    /// Cursor policy on failure:
    /// - fetch error: advance only when `advance-on-fetch-error` is set
    /// - save error: advance is attempted regardless; its own failure is
    ///   logged rather than silently lost
    /// - export error: logged, does not fail the platform
    /// - advance error on the success path: fails the platform
    async fn scan_platform(
        &mut self,
        platform: Platform,
        today: NaiveDate,
    ) -> Result<PlatformReport, TidemarkError> {
        let window = self.scheduler.next_window(&self.storage, platform, today)?;
        info!(%platform, %window, "Scanning platform");

        let paginator = ResultPaginator::new(&self.client, &self.config.crawl);
        let outcome = match paginator
            .collect(&self.storage, platform, &window, today)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                if self.config.crawl.advance_on_fetch_error {
                    if let Err(advance_err) =
                        self.scheduler.advance(&mut self.storage, platform, &window)
                    {
                        error!(
                            %platform,
                            error = %advance_err,
                            "Failed to advance cursor after fetch error"
                        );
                    }
                } else {
                    info!(%platform, %window, "Keeping window for retry after fetch error");
                }
                return Err(e.into());
            }
        };

        // Accounting only: how much of the batch is genuinely new. The
        // unique index during save is the authoritative dedup.
        let urls: Vec<&str> = outcome
            .results
            .iter()
            .map(|r| r.article_url.as_str())
            .collect();
        let new_urls = match self.storage.filter_new_urls(&urls) {
            Ok(fresh) => fresh.len(),
            Err(e) => {
                debug!(%platform, error = %e, "Batch dedup lookup failed, counts may overstate");
                urls.len()
            }
        };
        debug!(
            %platform,
            found = outcome.results.len(),
            new = new_urls,
            already_stored = outcome.results.len() - new_urls,
            "Reconciled batch against storage"
        );

        let inserted = match self.persister.save(&mut self.storage, &outcome.results) {
            Ok(inserted) => inserted,
            Err(e) => {
                if let Err(advance_err) =
                    self.scheduler.advance(&mut self.storage, platform, &window)
                {
                    error!(
                        %platform,
                        error = %advance_err,
                        "Failed to advance cursor after save error"
                    );
                }
                return Err(e);
            }
        };

        let exported = match self.persister.export(&outcome.results, platform) {
            Ok(exported) => exported,
            Err(e) => {
                error!(%platform, error = %e, "Export failed; database remains authoritative");
                0
            }
        };

        self.scheduler.advance(&mut self.storage, platform, &window)?;

        Ok(PlatformReport {
            platform,
            window,
            found: outcome.results.len(),
            skipped_known: outcome.skipped_known,
            dropped_undated: outcome.dropped_undated,
            dropped_outside: outcome.dropped_outside,
            inserted,
            exported,
        })
    }
}

/// Runs one full crawl cycle
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `today` - The current date
///
/// # Returns
///
/// * `Ok(RunSummary)` - Per-platform reports and failures
/// * `Err(TidemarkError)` - Initialization failed before any platform ran
///
/// # Example
///
/// ```no_run
/// use tidemark::config::load_config;
/// use tidemark::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("tidemark.toml"))?;
/// let today = chrono::Utc::now().date_naive();
/// let summary = run_crawl(config, today).await?;
/// assert!(summary.all_succeeded());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, today: NaiveDate) -> Result<RunSummary, TidemarkError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run(today).await
}
