//! Search API client
//!
//! This module handles all HTTP traffic for the crawler: a typed client for
//! the programmable-search JSON API, with the endpoint configurable so tests
//! can point it at a local mock server.

use crate::config::SearchConfig;
use crate::TidemarkError;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching a search page
///
/// All variants are transient from the orchestrator's point of view: the
/// scan for the current platform aborts and the next invocation retries.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, send)
    #[error("Search request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Search API returned HTTP {status}")]
    Status { status: u16 },

    /// The body arrived but did not decode as a search response
    #[error("Failed to decode search response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// One raw item from a search response page
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchItem {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub link: String,

    #[serde(default)]
    pub snippet: String,
}

/// Top-level search response shape
///
/// The API omits the `items` key entirely on pages past the last result,
/// so it defaults to an empty list.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<RawSearchItem>,
}

/// Builds an HTTP client for the search API
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("tidemark/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Typed client for the programmable-search JSON API
pub struct SearchClient {
    http: Client,
    api_key: String,
    engine_id: String,
    endpoint: String,
}

impl SearchClient {
    /// Creates a new search client from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The search API configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SearchClient)` - Successfully created client
    /// * `Err(TidemarkError)` - Failed to build the underlying HTTP client
    pub fn new(config: &SearchConfig) -> Result<Self, TidemarkError> {
        let http = build_http_client()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    /// Fetches one page of search results
    ///
    /// # Arguments
    ///
    /// * `query` - The full query text, including any date range operators
    /// * `start_index` - 1-based offset of the first result to return
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RawSearchItem>)` - The page's items (possibly empty)
    /// * `Err(FetchError)` - Transport, status, or decode failure
    pub async fn fetch_page(
        &self,
        query: &str,
        start_index: u32,
    ) -> Result<Vec<RawSearchItem>, FetchError> {
        let start = start_index.to_string();

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("start", start.as_str()),
            ])
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().await.map_err(FetchError::Decode)?;
        Ok(body.items)
    }
}
