//! Error types and utilities for Roster

use thiserror::Error;

/// Result type alias for Roster operations
pub type Result<T> = std::result::Result<T, RosterError>;

/// Main error type for Roster operations
#[derive(Error, Debug)]
pub enum RosterError {
    /// The requested employee is not in the cache
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Transport failure, timeout or non-2xx answer from the upstream employee API
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed or invalid input
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Creating an employee upstream failed; the cache was not touched
    #[error("Failed to create employee: {source}")]
    CreateFailed {
        #[source]
        source: Box<RosterError>,
    },

    /// Deleting an employee upstream failed; the cache was not touched
    #[error("Failed to delete employee: {source}")]
    DeleteFailed {
        #[source]
        source: Box<RosterError>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message
    #[error("{message}")]
    Generic { message: String },
}

impl RosterError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound {
            message: msg.into(),
        }
    }

    /// Create a new upstream error without a status code
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new upstream error for a non-2xx answer
    pub fn upstream_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Upstream {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new upstream error with source
    pub fn upstream_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Upstream {
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Wrap an upstream failure raised while creating an employee
    pub fn create_failed(source: RosterError) -> Self {
        Self::CreateFailed {
            source: Box::new(source),
        }
    }

    /// Wrap an upstream failure raised while deleting an employee
    pub fn delete_failed(source: RosterError) -> Self {
        Self::DeleteFailed {
            source: Box::new(source),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error means the requested resource is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status the upstream answered with, looking through mutation wrappers.
    ///
    /// `None` for transport failures (timeouts, refused connections, undecodable
    /// bodies) and for errors that never reached the upstream.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status_code, .. } => *status_code,
            Self::CreateFailed { source } | Self::DeleteFailed { source } => {
                source.upstream_status()
            }
            _ => None,
        }
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to RosterError
impl From<reqwest::Error> for RosterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::upstream_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::upstream_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16());
            Self::Upstream {
                message: format!("HTTP error: {}", status_code.unwrap_or(0)),
                status_code,
                source: Some(Box::new(err)),
            }
        } else if err.is_decode() {
            Self::upstream_with_source("Failed to decode upstream response", err)
        } else {
            Self::upstream_with_source("Upstream request failed", err)
        }
    }
}

/// Convert from validator::ValidationErrors to RosterError
impl From<validator::ValidationErrors> for RosterError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors.field_errors().keys().next().map(|f| (*f).to_string());
        Self::Validation {
            message: errors.to_string(),
            field,
        }
    }
}
