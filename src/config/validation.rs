use crate::config::types::{Config, CrawlConfig, ExportConfig, SearchConfig, StorageConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_crawl_config(&config.crawl)?;
    validate_storage_config(&config.storage)?;
    validate_export_config(&config.export)?;
    Ok(())
}

/// Validates search API configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.api_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api-key cannot be empty".to_string(),
        ));
    }

    if config.engine_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "engine-id cannot be empty".to_string(),
        ));
    }

    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "endpoint must use http or https, got '{}'",
            endpoint.scheme()
        )));
    }

    Ok(())
}

/// Validates crawl behavior configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    // The remote API hard-caps page size at 10
    if config.page_size < 1 || config.page_size > 10 {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and 10, got {}",
            config.page_size
        )));
    }

    if config.result_budget < config.page_size {
        return Err(ConfigError::Validation(format!(
            "result-budget must be >= page-size, got {} < {}",
            config.result_budget, config.page_size
        )));
    }

    if config.window_months < 1 {
        return Err(ConfigError::Validation(format!(
            "window-months must be >= 1, got {}",
            config.window_months
        )));
    }

    if config.platforms.is_empty() {
        return Err(ConfigError::Validation(
            "platforms cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for platform in &config.platforms {
        if !seen.insert(platform) {
            return Err(ConfigError::Validation(format!(
                "duplicate platform '{}' in platforms list",
                platform
            )));
        }
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates export configuration
fn validate_export_config(config: &ExportConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "export directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
