//! Tidemark: an incremental windowed search crawler
//!
//! This crate sweeps a programmable-search API through consecutive calendar
//! windows for a fixed set of commerce platforms, extracting dated article
//! results from search snippets, deduplicating them against prior runs, and
//! persisting them to SQLite plus per-platform CSV exports. A per-platform
//! progress cursor makes successive invocations resume where the last one
//! stopped.

pub mod config;
pub mod crawler;
pub mod export;
pub mod model;
pub mod snippet;
pub mod storage;

use thiserror::Error;

/// Main error type for Tidemark operations
#[derive(Debug, Error)]
pub enum TidemarkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Search fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Window computation error: {0}")]
    Window(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Tidemark operations
pub type Result<T> = std::result::Result<T, TidemarkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{Platform, SearchWindow};
pub use snippet::{clean_content, clean_title, parse_publish_date};
