//! Write path: upstream first, then the cache

use crate::sync::CacheSync;
use roster_common::{Employee, EmployeeDraft, EmployeeId, Result, RosterError};
use tracing::{info, instrument, warn};
use validator::Validate;

/// Applies creates and deletes to the upstream and mirrors them into the cache.
///
/// A failed upstream call leaves the cache untouched. Nothing is retried and
/// nothing is rolled back upstream.
#[derive(Debug, Clone)]
pub struct MutationCoordinator {
    sync: CacheSync,
}

impl MutationCoordinator {
    /// Create a coordinator over the given synchroniser
    pub fn new(sync: CacheSync) -> Self {
        Self { sync }
    }

    /// Validate `draft`, create it upstream and cache the upstream's record
    ///
    /// # Errors
    ///
    /// `Validation` for an invalid draft (the upstream is not called),
    /// `CreateFailed` wrapping the upstream error otherwise.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_employee(&self, draft: EmployeeDraft) -> Result<Employee> {
        draft.validate()?;

        let _gate = self.sync.cache().write_gate().lock().await;
        let created = self.sync.upstream().create(&draft).await.map_err(|e| {
            warn!("Upstream rejected employee creation: {}", e);
            RosterError::create_failed(e)
        })?;

        self.sync.cache().insert(created.clone());
        info!(id = %created.id(), "Employee created");
        Ok(created)
    }

    /// Delete the employee cached under `id` and return its last known record
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is not cached (the upstream is not called),
    /// `DeleteFailed` wrapping the upstream error otherwise.
    #[instrument(skip(self))]
    pub async fn delete_employee_by_id(&self, id: &EmployeeId) -> Result<Employee> {
        self.sync.find_by_id(id).await?;

        let _gate = self.sync.cache().write_gate().lock().await;
        // A refresh may have dropped the record while we waited for the gate.
        let employee = self.sync.cache().find_by_id(id)?;

        self.sync.upstream().delete(&employee).await.map_err(|e| {
            warn!("Upstream rejected deletion of {}: {}", id, e);
            RosterError::delete_failed(e)
        })?;

        self.sync.cache().remove(id);
        info!("Employee {} deleted", employee.name());
        Ok(employee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EmployeeCache;
    use crate::test_utils::FakeUpstream;
    use roster_common::test_utils::{draft, john_and_jane};
    use roster_upstream::{EmployeeUpstream, MockEmployeeUpstream};
    use std::sync::Arc;

    fn coordinator_over(upstream: Arc<dyn EmployeeUpstream>) -> (MutationCoordinator, CacheSync) {
        let sync = CacheSync::new(Arc::new(EmployeeCache::new()), upstream);
        (MutationCoordinator::new(sync.clone()), sync)
    }

    #[tokio::test]
    async fn test_created_employee_is_findable() {
        let (coordinator, sync) = coordinator_over(Arc::new(FakeUpstream::with_employees(john_and_jane())));
        sync.refresh().await.unwrap();

        let created = coordinator.create_employee(draft("New Hire", 70_000)).await.unwrap();

        assert_eq!(sync.find_by_id(created.id()).await.unwrap(), created);
        assert_eq!(sync.cache().len(), 3);
    }

    #[tokio::test]
    async fn test_deleted_employee_is_gone() {
        let upstream = Arc::new(FakeUpstream::with_employees(john_and_jane()));
        let (coordinator, sync) = coordinator_over(upstream.clone());

        let deleted = coordinator.delete_employee_by_id(&"1".into()).await.unwrap();

        assert_eq!(deleted.name(), "John Doe");
        assert!(sync.find_by_id(&"1".into()).await.unwrap_err().is_not_found());
        assert_eq!(upstream.employees().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_upstream() {
        let mut mock = MockEmployeeUpstream::new();
        mock.expect_create().never();
        let (coordinator, _) = coordinator_over(Arc::new(mock));

        let err = coordinator
            .create_employee(EmployeeDraft::new("   ", 1, 30, "Engineer"))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Validation { .. }));

        let err = coordinator
            .create_employee(EmployeeDraft::new("Old Timer", 1, 0, "Engineer"))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_failed_create_leaves_cache_unchanged() {
        let mut mock = MockEmployeeUpstream::new();
        mock.expect_list_all().returning(|| Ok(john_and_jane()));
        mock.expect_create()
            .times(1)
            .returning(|_| Err(RosterError::upstream_with_status("Too Many Requests", 429)));
        let (coordinator, sync) = coordinator_over(Arc::new(mock));
        sync.refresh().await.unwrap();
        let generation = sync.cache().generation();

        let err = coordinator.create_employee(draft("New Hire", 1)).await.unwrap_err();

        assert!(matches!(err, RosterError::CreateFailed { .. }));
        assert_eq!(err.upstream_status(), Some(429));
        assert_eq!(sync.cache().len(), 2);
        assert_eq!(sync.cache().generation(), generation);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_cache_unchanged() {
        let mut mock = MockEmployeeUpstream::new();
        mock.expect_list_all().returning(|| Ok(john_and_jane()));
        mock.expect_delete()
            .withf(|employee| employee.name() == "Jane Doe")
            .times(1)
            .returning(|_| Err(RosterError::upstream("Connection failed")));
        let (coordinator, sync) = coordinator_over(Arc::new(mock));

        let err = coordinator.delete_employee_by_id(&"2".into()).await.unwrap_err();

        assert!(matches!(err, RosterError::DeleteFailed { .. }));
        assert_eq!(err.upstream_status(), None);
        assert!(sync.cache().find_by_id(&"2".into()).is_ok());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_never_reaches_upstream() {
        let mut mock = MockEmployeeUpstream::new();
        mock.expect_list_all().times(1).returning(|| Ok(john_and_jane()));
        mock.expect_delete().never();
        let (coordinator, _) = coordinator_over(Arc::new(mock));

        let err = coordinator.delete_employee_by_id(&"42".into()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
