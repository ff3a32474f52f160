//! Single handle over the read and write paths

use crate::cache::{CacheStatus, EmployeeCache, ReconcileStats};
use crate::mutation::MutationCoordinator;
use crate::query::{QueryConfig, QueryEngine};
use crate::scheduler::RefreshScheduler;
use crate::sync::CacheSync;
use roster_common::{Employee, EmployeeDraft, EmployeeId, Result};
use roster_upstream::EmployeeUpstream;
use std::sync::Arc;
use std::time::Duration;

/// Service-level settings
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Interval between scheduled refreshes
    pub refresh_interval: Duration,
    /// Derived-view settings
    pub query: QueryConfig,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(300),
            query: QueryConfig::default(),
        }
    }
}

/// Employee operations used by the HTTP layer and the binary
#[derive(Debug, Clone)]
pub struct EmployeeService {
    sync: CacheSync,
    queries: QueryEngine,
    mutations: MutationCoordinator,
    refresh_interval: Duration,
}

impl EmployeeService {
    /// Build the service around a fresh, cold cache
    pub fn new(upstream: Arc<dyn EmployeeUpstream>, options: ServiceOptions) -> Self {
        Self::with_cache(Arc::new(EmployeeCache::new()), upstream, options)
    }

    /// Build the service around an existing cache
    pub fn with_cache(
        cache: Arc<EmployeeCache>,
        upstream: Arc<dyn EmployeeUpstream>,
        options: ServiceOptions,
    ) -> Self {
        let sync = CacheSync::new(cache, upstream);
        Self {
            queries: QueryEngine::new(sync.clone(), options.query),
            mutations: MutationCoordinator::new(sync.clone()),
            sync,
            refresh_interval: options.refresh_interval,
        }
    }

    /// A scheduler that keeps this service's cache fresh
    pub fn refresh_scheduler(&self) -> RefreshScheduler {
        RefreshScheduler::new(self.sync.clone(), self.refresh_interval)
    }

    /// Reconcile the cache against the upstream now
    pub async fn refresh(&self) -> Result<ReconcileStats> {
        self.sync.refresh().await
    }

    /// Every employee
    pub async fn get_all_employees(&self) -> Result<Vec<Employee>> {
        self.queries.all().await
    }

    /// Employees whose name contains `fragment`
    pub async fn get_employees_by_name_search(&self, fragment: &str) -> Result<Vec<Employee>> {
        self.queries.by_name_contains(fragment).await
    }

    /// A single employee
    pub async fn get_employee_by_id(&self, id: &EmployeeId) -> Result<Employee> {
        self.queries.by_id(id).await
    }

    /// Highest salary, `0` with no employees
    pub async fn get_highest_salary(&self) -> Result<u32> {
        self.queries.max_salary().await
    }

    /// Names of the best paid employees, highest first
    pub async fn get_top_earner_names(&self) -> Result<Vec<String>> {
        self.queries.top_earner_names().await
    }

    /// Create an employee upstream and cache it
    pub async fn create_employee(&self, draft: EmployeeDraft) -> Result<Employee> {
        self.mutations.create_employee(draft).await
    }

    /// Delete an employee upstream and evict it
    pub async fn delete_employee_by_id(&self, id: &EmployeeId) -> Result<Employee> {
        self.mutations.delete_employee_by_id(id).await
    }

    /// Health summary of the cache
    pub fn cache_status(&self) -> CacheStatus {
        self.sync.cache().status()
    }

    /// The shared cache
    pub fn cache(&self) -> &Arc<EmployeeCache> {
        self.sync.cache()
    }
}
