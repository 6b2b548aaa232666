use crate::model::Platform;
use chrono::NaiveDate;
use serde::Deserialize;

/// Main configuration structure for Tidemark
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    pub crawl: CrawlConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Remote search API credentials and endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// API key sent as the `key` request parameter
    #[serde(rename = "api-key")]
    pub api_key: String,

    /// Search engine identifier sent as the `cx` request parameter
    #[serde(rename = "engine-id")]
    pub engine_id: String,

    /// Endpoint URL; defaults to the public API, tests point it at a mock
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Results requested per page (the API rejects values above 10)
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Maximum results accumulated per platform per window; also caps the
    /// request offset
    #[serde(rename = "result-budget", default = "default_result_budget")]
    pub result_budget: u32,

    /// Calendar months covered by one search window
    #[serde(rename = "window-months", default = "default_window_months")]
    pub window_months: u32,

    /// Start of the very first window, before any cursor exists
    #[serde(rename = "floor-date", default = "default_floor_date")]
    pub floor_date: NaiveDate,

    /// Platforms to scan, in order; defaults to all known platforms
    #[serde(default = "default_platforms")]
    pub platforms: Vec<Platform>,

    /// Whether the progress cursor still advances when a scan dies on a
    /// fetch error. Fail-forward (the default) guarantees forward progress
    /// at the cost of possibly never scanning the failed window; turning it
    /// off keeps the window for retry and accepts duplicate work instead.
    #[serde(rename = "advance-on-fetch-error", default = "default_advance_on_fetch_error")]
    pub advance_on_fetch_error: bool,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// CSV export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory the per-platform CSV files are written into
    #[serde(default = "default_export_directory")]
    pub directory: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
        }
    }
}

fn default_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_result_budget() -> u32 {
    100
}

fn default_window_months() -> u32 {
    3
}

fn default_floor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 12, 31).unwrap_or(NaiveDate::MIN)
}

fn default_platforms() -> Vec<Platform> {
    Platform::ALL.to_vec()
}

fn default_advance_on_fetch_error() -> bool {
    true
}

fn default_export_directory() -> String {
    "scrape_results".to_string()
}
