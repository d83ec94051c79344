/// Configuration loading from TOML file and environment
use std::path::Path;

use crate::error::{BankdayError, Result};
use crate::types::Config;

/// Prefix for environment overrides, e.g. `BANKDAY_MAX_WALK_DAYS=400`
pub const ENV_PREFIX: &str = "BANKDAY";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| BankdayError::ConfigError(format!("Failed to read config file: {}", e)))?;

    parse_config(&content)
}

/// Parse and validate a TOML document
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| BankdayError::ConfigError(format!("Failed to parse config: {}", e)))?;

    validate_config(&config)?;

    Ok(config)
}

/// Layered settings: defaults, then the optional file, then `BANKDAY_*` variables
pub fn load_settings(path: Option<&Path>) -> Result<Config> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            return Err(BankdayError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .map_err(|e| BankdayError::ConfigError(format!("Failed to load settings: {}", e)))?;

    let config: Config = settings
        .try_deserialize()
        .map_err(|e| BankdayError::ConfigError(format!("Failed to parse settings: {}", e)))?;

    validate_config(&config)?;

    Ok(config)
}

pub(crate) fn validate_config(config: &Config) -> Result<()> {
    // Validate business hours
    if config.business_close_hour > 23 {
        return Err(BankdayError::ConfigError(format!(
            "Invalid business_close_hour: {}",
            config.business_close_hour
        )));
    }

    if config.business_open_hour >= config.business_close_hour {
        return Err(BankdayError::ConfigError(
            "business_open_hour must be < business_close_hour".to_string(),
        ));
    }

    // Validate limits
    if config.max_walk_days < 7 {
        return Err(BankdayError::ConfigError(format!(
            "max_walk_days must be >= 7, got {}",
            config.max_walk_days
        )));
    }

    if config.dst_cache_capacity == 0 {
        return Err(BankdayError::ConfigError(
            "dst_cache_capacity must be >= 1".to_string(),
        ));
    }

    Ok(())
}
