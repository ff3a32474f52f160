//! Custom field validators used by the configuration schema

use std::net::SocketAddr;
use validator::ValidationError;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Validate a log filter.
///
/// Accepts a bare level (`info`) or comma-separated `target=level` directives
/// (`roster_core=debug,tower_http=info`).
pub fn validate_log_level(filter: &str) -> Result<(), ValidationError> {
    if filter.trim().is_empty() {
        return Err(ValidationError::new("empty_log_level"));
    }

    let valid = filter.split(',').map(str::trim).all(|directive| {
        let level = directive.rsplit('=').next().unwrap_or(directive);
        LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
    });

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Validate a `host:port` listen address
pub fn validate_bind_address(address: &str) -> Result<(), ValidationError> {
    address
        .parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_bind_address"))
}
