//! Application configuration structures

use roster_common::{LogFormat, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// HTTP listener configuration
    #[validate]
    pub server: ServerConfig,

    /// Upstream employee API configuration
    #[validate]
    pub upstream: UpstreamConfig,

    /// Read cache configuration
    #[validate]
    pub cache: CacheConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingSettings,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address in `host:port` form
    #[validate(custom(
        function = "crate::validation::validate_bind_address",
        message = "Bind address must be a host:port socket address"
    ))]
    pub bind_address: String,
}

/// Upstream employee API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Collection URL of the upstream employee resource
    #[validate(url(message = "Upstream URL must be a valid URL"))]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Idle connections kept per upstream host
    #[validate(range(max = 1000, message = "Pool size cannot exceed 1000"))]
    pub max_idle_per_host: usize,

    /// Client-side request budget per second
    #[validate(range(min = 1, max = 10000, message = "Rate limit must be between 1 and 10000"))]
    pub rate_limit_per_sec: u32,
}

/// Read cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds between full reconciliations against the upstream
    #[validate(range(min = 1, max = 86400, message = "Refresh interval must be between 1 second and 1 day"))]
    pub refresh_interval_seconds: u64,

    /// Number of names returned by the top earners endpoint
    #[validate(range(min = 1, max = 1000, message = "Top N must be between 1 and 1000"))]
    pub top_n: usize,

    /// Lifetime of memoised derived views in seconds
    #[validate(range(min = 1, max = 86400, message = "Derived view TTL must be between 1 second and 1 day"))]
    pub derived_view_ttl_seconds: u64,

    /// Maximum number of memoised derived views
    #[validate(range(min = 1, max = 100000, message = "Derived view capacity must be between 1 and 100000"))]
    pub derived_view_capacity: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log filter (a level or `target=level` directives)
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Log level must be one of: trace, debug, info, warn, error, off"
    ))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Output style
    pub format: LogFormat,
}

impl Config {
    /// Validate the whole tree, nested sections included
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8111".to_string(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8112/api/v1/employee".to_string(),
            timeout_seconds: 10,
            max_idle_per_host: 10,
            rate_limit_per_sec: 10,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: 300,
            top_n: 10,
            derived_view_ttl_seconds: 300,
            derived_view_capacity: 1024,
        }
    }
}

impl CacheConfig {
    /// Interval between scheduled refreshes
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    /// Lifetime of memoised derived views
    pub fn derived_view_ttl(&self) -> Duration {
        Duration::from_secs(self.derived_view_ttl_seconds)
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingSettings {
    /// Convert into the subscriber settings understood by `roster_common::init_logging`
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            format: self.format,
            file_path: self.file.clone(),
            ..LoggingConfig::default()
        }
    }
}
