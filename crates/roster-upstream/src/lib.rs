//! # Roster Upstream
//!
//! Client side of the upstream employee API. [`EmployeeUpstream`] is the seam
//! the cache and mutation layers depend on; [`HttpEmployeeClient`] is the
//! reqwest implementation used in production.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod models;
pub mod traits;

pub use client::{ClientMetrics, HttpEmployeeClient, UpstreamClientConfig};
pub use models::{CreateEmployeeRequest, DeleteEmployeeRequest, UpstreamEnvelope};
pub use traits::EmployeeUpstream;

#[cfg(any(test, feature = "mocks"))]
pub use traits::MockEmployeeUpstream;
