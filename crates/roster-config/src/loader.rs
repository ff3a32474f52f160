//! Configuration loading utilities

use crate::Config;
use roster_common::RosterError;
use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "ROSTER_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for RosterError {
    fn from(err: ConfigError) -> Self {
        RosterError::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        debug!(path = %path.as_ref().display(), "Parsed configuration file");

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from `ROSTER_CONFIG_PATH`, `roster.yaml`, `roster.yml`
    /// or built-in defaults, in that order
    pub fn load() -> Result<Config, ConfigError> {
        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            info!("Loading configuration from {}", config_path);
            return Self::load_config(&config_path);
        }

        for candidate in ["roster.yaml", "roster.yml"] {
            if Path::new(candidate).exists() {
                info!("Loading configuration from {}", candidate);
                return Self::load_config(candidate);
            }
        }

        info!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config(path)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |name| env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup("ROSTER_BIND_ADDRESS") {
            config.server.bind_address = address;
        }

        if let Some(url) = lookup("ROSTER_UPSTREAM_URL") {
            config.upstream.base_url = url;
        }

        if let Some(timeout) = lookup("ROSTER_UPSTREAM_TIMEOUT") {
            config.upstream.timeout_seconds = parse_var("ROSTER_UPSTREAM_TIMEOUT", &timeout)?;
        }

        if let Some(rate) = lookup("ROSTER_UPSTREAM_RATE_LIMIT") {
            config.upstream.rate_limit_per_sec = parse_var("ROSTER_UPSTREAM_RATE_LIMIT", &rate)?;
        }

        if let Some(interval) = lookup("ROSTER_REFRESH_INTERVAL_SECS") {
            config.cache.refresh_interval_seconds =
                parse_var("ROSTER_REFRESH_INTERVAL_SECS", &interval)?;
        }

        if let Some(top_n) = lookup("ROSTER_TOP_N") {
            config.cache.top_n = parse_var("ROSTER_TOP_N", &top_n)?;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(file) = lookup("LOG_FILE") {
            config.logging.file = Some(file);
        }

        if let Some(format) = lookup("LOG_FORMAT") {
            config.logging.format = parse_var("LOG_FORMAT", &format)?;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}
