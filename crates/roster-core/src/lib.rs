//! # Roster Core
//!
//! The read cache and everything that keeps it honest:
//!
//! - [`EmployeeCache`]: concurrent id-keyed store with wholesale reconciliation
//! - [`CacheSync`]: lazy population and on-demand refresh from the upstream
//! - [`RefreshScheduler`]: periodic refresh in a cancellable background task
//! - [`QueryEngine`]: snapshot reads and memoised derived views
//! - [`MutationCoordinator`]: upstream-first creates and deletes
//! - [`EmployeeService`]: one handle over all of the above

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod mutation;
pub mod query;
pub mod scheduler;
pub mod service;
pub mod sync;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use cache::{CacheStatus, EmployeeCache, ReconcileStats};
pub use mutation::MutationCoordinator;
pub use query::{QueryConfig, QueryEngine, DEFAULT_TOP_N};
pub use scheduler::RefreshScheduler;
pub use service::{EmployeeService, ServiceOptions};
pub use sync::CacheSync;
