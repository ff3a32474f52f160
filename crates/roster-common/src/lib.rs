//! # Roster Common
//!
//! Shared types, the error taxonomy and logging setup for the Roster workspace.
//!
//! Every other crate in the workspace depends on this one for [`Employee`],
//! [`RosterError`] and the tracing bootstrap.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, RosterError};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use types::*;
