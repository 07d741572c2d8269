use crate::config::types::{Config, OutputConfig, RegionEntry, ScraperConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    validate_regions(&config.regions)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.wait_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "wait-timeout-ms must be > 0".to_string(),
        ));
    }

    if config.poll_interval_ms == 0 {
        return Err(ConfigError::Validation(
            "poll-interval-ms must be > 0".to_string(),
        ));
    }

    if config.poll_interval_ms > config.wait_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "poll-interval-ms ({}) must not exceed wait-timeout-ms ({})",
            config.poll_interval_ms, config.wait_timeout_ms
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the region entries
///
/// Every region needs a non-empty, unique name and an http(s) listing URL.
fn validate_regions(regions: &[RegionEntry]) -> Result<(), ConfigError> {
    if regions.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[region]] entry is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for region in regions {
        if region.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "region name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(region.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate region name '{}'",
                region.name
            )));
        }

        let url = Url::parse(&region.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("region '{}': {}", region.name, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "region '{}': unsupported scheme '{}'",
                region.name,
                url.scheme()
            )));
        }
    }

    Ok(())
}
