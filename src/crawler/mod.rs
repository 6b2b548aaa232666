//! Crawler module for windowed search scanning
//!
//! This module contains the core crawling logic, including:
//! - The typed search API client
//! - Sequential pagination of platform/window scans
//! - Window scheduling over per-platform progress cursors
//! - Persistence and export of scanned batches
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod paginator;
mod persister;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, PlatformReport, RunSummary};
pub use fetcher::{build_http_client, FetchError, RawSearchItem, SearchClient, SearchResponse};
pub use paginator::{build_query, PaginationOutcome, ResultPaginator};
pub use persister::Persister;
pub use scheduler::WindowScheduler;
