use crate::config::types::{Config, CrawlerConfig, HttpConfig};
use crate::url::normalize_url;
use crate::ConfigError;

/// Validates the entire configuration
///
/// Public so that a configuration changed after loading (for example by
/// command-line overrides) can be checked again.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    normalize_url(&config.seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed '{}': {}", config.seed, e)))?;

    validate_range("fetch-workers", config.fetch_workers, 1, 1000)?;
    validate_range("parse-workers", config.parse_workers, 1, 1000)?;
    validate_range("max-attempts", config.max_attempts as usize, 1, 100)?;

    for ext in &config.allowed_extensions {
        validate_extension(ext)?;
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_range(name: &str, value: usize, min: usize, max: usize) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Validation(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

/// An extension is compared against the text after the last `.` of a path,
/// so it cannot itself contain a `.` or a `/`
fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    let bare = ext.strip_prefix('.').unwrap_or(ext);

    if bare.is_empty() {
        return Err(ConfigError::Validation(
            "allowed-extensions entries cannot be empty".to_string(),
        ));
    }

    if bare.contains('.') || bare.contains('/') {
        return Err(ConfigError::Validation(format!(
            "Extension '{}' cannot contain '.' or '/'",
            ext
        )));
    }

    Ok(())
}
