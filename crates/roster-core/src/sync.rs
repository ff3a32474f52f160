//! Keeps the [`EmployeeCache`] in step with the upstream listing

use crate::cache::{EmployeeCache, ReconcileStats};
use roster_common::{Employee, EmployeeId, Result};
use roster_upstream::EmployeeUpstream;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Cache plus the upstream it mirrors.
///
/// Cheap to clone; every clone shares the same cache and client.
#[derive(Clone)]
pub struct CacheSync {
    cache: Arc<EmployeeCache>,
    upstream: Arc<dyn EmployeeUpstream>,
}

impl CacheSync {
    /// Create a synchroniser for the given cache and upstream
    pub fn new(cache: Arc<EmployeeCache>, upstream: Arc<dyn EmployeeUpstream>) -> Self {
        Self { cache, upstream }
    }

    /// The shared cache
    pub fn cache(&self) -> &Arc<EmployeeCache> {
        &self.cache
    }

    /// The upstream client
    pub fn upstream(&self) -> &Arc<dyn EmployeeUpstream> {
        &self.upstream
    }

    /// Fetch the full upstream listing and reconcile the cache against it.
    ///
    /// On failure the cache is left exactly as it was.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<ReconcileStats> {
        let _gate = self.cache.write_gate().lock().await;
        self.fetch_and_reconcile().await
    }

    /// Populate the cache from the upstream if it has never been warmed.
    ///
    /// Concurrent first readers wait on the write gate and only the first
    /// one fetches.
    pub async fn ensure_warm(&self) -> Result<()> {
        if self.cache.is_warm() {
            return Ok(());
        }

        let _gate = self.cache.write_gate().lock().await;
        if self.cache.is_warm() {
            debug!("Cache warmed while waiting for the write gate");
            return Ok(());
        }

        info!("Employee cache is cold, populating from upstream");
        self.fetch_and_reconcile().await.map(|_| ())
    }

    /// Every cached employee, populating lazily on first use
    pub async fn all(&self) -> Result<Vec<Employee>> {
        self.ensure_warm().await?;
        Ok(self.cache.snapshot())
    }

    /// Single employee by id, populating lazily on first use
    pub async fn find_by_id(&self, id: &EmployeeId) -> Result<Employee> {
        self.ensure_warm().await?;
        self.cache.find_by_id(id)
    }

    async fn fetch_and_reconcile(&self) -> Result<ReconcileStats> {
        match self.upstream.list_all().await {
            Ok(fresh) => Ok(self.cache.reconcile(fresh)),
            Err(e) => {
                warn!("Upstream listing failed, keeping {} cached employees: {}", self.cache.len(), e);
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for CacheSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheSync")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
