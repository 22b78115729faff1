use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Keys missing from the file keep their default values.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Loads the configuration at `path`, or the validated defaults when no path is given
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}
