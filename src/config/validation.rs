use crate::config::types::{Config, CrawlerConfig, StoreBackend, StoreConfig, TargetConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target_config(&config.target)?;
    validate_crawler_config(&config.crawler)?;
    validate_store_config(&config.store)?;
    Ok(())
}

/// Validates the seed URL
fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    let raw = config.url.trim();

    if raw.is_empty() {
        return Err(ConfigError::Validation(
            "target url cannot be empty".to_string(),
        ));
    }

    if raw.contains("PLACEHOLDER") {
        return Err(ConfigError::Validation(format!(
            "target url is still a placeholder: '{}'",
            raw
        )));
    }

    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid target url '{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Target url '{}' must use http or https",
            raw
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Target url '{}' has no host",
            raw
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.min_article_chars == 0 {
        return Err(ConfigError::Validation(
            "min_article_chars must be > 0".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates store configuration for the selected backend
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.table.trim().is_empty() {
        return Err(ConfigError::Validation(
            "store table cannot be empty".to_string(),
        ));
    }

    match config.backend() {
        StoreBackend::Supabase => {
            if config.url.trim().is_empty() || config.key.trim().is_empty() {
                return Err(ConfigError::MissingCredentials(
                    "SUPABASE_URL and SUPABASE_KEY must both be set".to_string(),
                ));
            }

            Url::parse(config.url.trim()).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid store url '{}': {}", config.url, e))
            })?;
        }
        StoreBackend::Sqlite => {
            if config.database_path.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "database_path cannot be empty".to_string(),
                ));
            }
        }
    }

    Ok(())
}
