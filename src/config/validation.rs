use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.ranking_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid ranking-url '{}': {}", config.ranking_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "ranking-url must use HTTP or HTTPS, got '{}'",
            url.scheme()
        )));
    }

    // request_delay_ms may be 0: the pause is then skipped entirely

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent value cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.cache_dir.is_empty() {
        return Err(ConfigError::Validation(
            "cache-dir cannot be empty".to_string(),
        ));
    }

    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
