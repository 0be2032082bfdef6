use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates site addressing: the base URL must be absolute http(s), and the
/// relative paths must join onto it
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    for (name, path) in [
        ("category-path", &config.category_path),
        ("text-endpoint", &config.text_endpoint),
    ] {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
        base.join(path).map_err(|e| {
            ConfigError::InvalidUrl(format!("{} '{}' does not resolve: {}", name, path, e))
        })?;
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // An hour-long pause is certainly a typo for seconds vs milliseconds
    if config.connection_pause_ms > 3_600_000 {
        return Err(ConfigError::Validation(format!(
            "connection-pause-ms must be <= 3600000, got {}",
            config.connection_pause_ms
        )));
    }

    if config.max_consecutive_listing_failures == 0 {
        return Err(ConfigError::Validation(
            "max-consecutive-listing-failures must be at least 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.manifest_name.is_empty() {
        return Err(ConfigError::Validation(
            "manifest-name cannot be empty".to_string(),
        ));
    }

    if config.manifest_name.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "manifest-name must be a bare file name, got '{}'",
            config.manifest_name
        )));
    }

    if config.placeholder.is_empty() {
        return Err(ConfigError::Validation(
            "placeholder cannot be empty".to_string(),
        ));
    }

    Ok(())
}
