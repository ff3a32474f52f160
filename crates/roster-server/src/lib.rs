//! # Roster Server
//!
//! HTTP surface of the Roster employee service: the axum router, the
//! error-to-status mapping and the server loop used by the `roster` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod error;

pub use api::{create_router, start_server, ApiState, HealthResponse, DELETE_SUCCESS_MESSAGE};
pub use error::{ApiError, ErrorBody};
