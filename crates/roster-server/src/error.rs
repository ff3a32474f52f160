//! Mapping from service errors to HTTP responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_common::RosterError;
use serde::Serialize;
use tracing::{error, warn};

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// HTTP status code
    pub status: u16,
    /// Client-safe description
    pub message: String,
}

/// An error ready to be sent to the client.
///
/// Internal details are logged when the error is built and never reach the
/// response body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Build an error with an explicit status
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-facing message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Mutation failures: the upstream answered with an error status → 500,
/// the upstream could not be reached or understood → 400.
fn mutation_status(err: &RosterError) -> StatusCode {
    if err.upstream_status().is_some() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::BAD_REQUEST
    }
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        let (status, message) = match &err {
            RosterError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            RosterError::Validation { message, .. } => (StatusCode::BAD_REQUEST, message.clone()),
            RosterError::CreateFailed { .. } => {
                (mutation_status(&err), "Failed to create employee".to_string())
            }
            RosterError::DeleteFailed { .. } => {
                (mutation_status(&err), "Failed to delete employee".to_string())
            }
            RosterError::Upstream { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Employee data is currently unavailable".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), "Request failed: {}", err);
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", err);
        }

        Self { status, message }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Malformed request body: {}", rejection.body_text());
        Self::new(StatusCode::BAD_REQUEST, "Malformed employee payload")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: self.status.as_u16(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
