use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::sites::SiteId;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_sites(config)?;
    validate_origins(config)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.target_images < 1 {
        return Err(ConfigError::Validation(format!(
            "target_images must be >= 1, got {}",
            config.target_images
        )));
    }

    if config.retry_attempts < 1 || config.retry_attempts > 20 {
        return Err(ConfigError::Validation(format!(
            "retry_attempts must be between 1 and 20, got {}",
            config.retry_attempts
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_skipped_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_skipped_pages must be >= 1, got {}",
            config.max_skipped_pages
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.root.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output root cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the site table: known keys, at least one enabled
fn validate_sites(config: &Config) -> Result<(), ConfigError> {
    let enabled = config.enabled_sites()?;

    if enabled.is_empty() {
        return Err(ConfigError::Validation(
            "at least one site must be enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates origin overrides: known keys, http(s) URLs with a host
fn validate_origins(config: &Config) -> Result<(), ConfigError> {
    for key in config.origins.keys() {
        if key.parse::<SiteId>().is_err() {
            return Err(ConfigError::UnsupportedSite(key.clone()));
        }
    }

    for site in SiteId::ALL {
        if let Some(origin) = config.origin_for(site)? {
            if origin.scheme() != "http" && origin.scheme() != "https" {
                return Err(ConfigError::InvalidUrl(format!(
                    "Origin for '{}' must use http or https, got '{}'",
                    site,
                    origin.scheme()
                )));
            }

            if origin.host_str().is_none() {
                return Err(ConfigError::InvalidUrl(format!(
                    "Origin for '{}' has no host",
                    site
                )));
            }
        }
    }

    Ok(())
}
