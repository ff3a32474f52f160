//! The upstream contract the rest of the service is written against.

use async_trait::async_trait;
use roster_common::{Employee, EmployeeDraft, Result};

/// Source of truth for employee records.
///
/// Every failure (transport, timeout, rate limiting, non-2xx, undecodable
/// body) is returned as `RosterError::Upstream`; implementations never
/// swallow errors or retry.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait EmployeeUpstream: Send + Sync {
    /// Full listing of employees as currently known upstream.
    async fn list_all(&self) -> Result<Vec<Employee>>;

    /// Create an employee; returns the record with its upstream-assigned id and email.
    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee>;

    /// Delete a previously resolved employee.
    async fn delete(&self, employee: &Employee) -> Result<()>;
}
