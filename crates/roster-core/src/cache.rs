//! Concurrent, id-keyed employee cache reconciled against the upstream listing

use chrono::{DateTime, TimeZone, Utc};
use dashmap::DashMap;
use roster_common::{Employee, EmployeeId, Result, RosterError};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Outcome of a wholesale reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Entries dropped because the upstream no longer lists them
    pub removed: usize,
    /// Entries the cache did not hold before
    pub inserted: usize,
    /// Entries that were present and have been replaced by the fresh record
    pub retained: usize,
}

/// Point-in-time description of the cache used by health reporting
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    /// Whether at least one reconciliation has succeeded
    pub warm: bool,
    /// Number of cached employees
    pub size: usize,
    /// Mutation counter
    pub generation: u64,
    /// Time of the last successful reconciliation
    pub last_reconciled: Option<DateTime<Utc>>,
}

/// The process-wide employee cache.
///
/// Readers go straight to the map. Writers that talk to the upstream first
/// (refresh, create, delete) hold [`EmployeeCache::write_gate`] for the whole
/// call so a listing fetched before a mutation can never be applied after it.
#[derive(Debug, Default)]
pub struct EmployeeCache {
    entries: DashMap<EmployeeId, Employee>,
    warmed: AtomicBool,
    generation: AtomicU64,
    last_reconciled_ms: AtomicI64,
    write_gate: Mutex<()>,
}

impl EmployeeCache {
    /// Create an empty, unwarmed cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache contents with `fresh`.
    ///
    /// Ids missing from `fresh` are evicted and every fresh record replaces
    /// whatever was cached under its id. The cache is warm afterwards.
    pub fn reconcile(&self, fresh: Vec<Employee>) -> ReconcileStats {
        let keep: HashSet<EmployeeId> = fresh.iter().map(|e| e.id().clone()).collect();
        let existing: HashSet<EmployeeId> =
            self.entries.iter().map(|entry| entry.key().clone()).collect();

        // Counted per distinct id; a repeated id in `fresh` keeps its last record.
        let stats = ReconcileStats {
            removed: existing.difference(&keep).count(),
            inserted: keep.difference(&existing).count(),
            retained: keep.intersection(&existing).count(),
        };

        self.entries.retain(|id, _| keep.contains(id));
        for employee in fresh {
            self.entries.insert(employee.id().clone(), employee);
        }

        self.warmed.store(true, Ordering::Release);
        self.last_reconciled_ms
            .store(Utc::now().timestamp_millis(), Ordering::Release);
        self.bump_generation();

        info!(
            removed = stats.removed,
            inserted = stats.inserted,
            retained = stats.retained,
            "Employee cache reconciled ({} entries)",
            self.entries.len()
        );
        stats
    }

    /// Copy of every cached employee
    pub fn snapshot(&self) -> Vec<Employee> {
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Look up a single employee
    pub fn find_by_id(&self, id: &EmployeeId) -> Result<Employee> {
        self.entries
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RosterError::not_found(format!("No employee found with id: {id}")))
    }

    /// Insert or replace a single employee
    pub fn insert(&self, employee: Employee) -> Option<Employee> {
        debug!("Caching employee {}", employee.id());
        let previous = self.entries.insert(employee.id().clone(), employee);
        self.bump_generation();
        previous
    }

    /// Remove a single employee
    pub fn remove(&self, id: &EmployeeId) -> Option<Employee> {
        let removed = self.entries.remove(id).map(|(_, employee)| employee);
        if removed.is_some() {
            debug!("Evicted employee {}", id);
            self.bump_generation();
        }
        removed
    }

    /// Number of cached employees
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no employees
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a reconciliation has ever succeeded
    pub fn is_warm(&self) -> bool {
        self.warmed.load(Ordering::Acquire)
    }

    /// Counter bumped on every change; derived views are keyed by it
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Time of the last successful reconciliation
    pub fn last_reconciled(&self) -> Option<DateTime<Utc>> {
        match self.last_reconciled_ms.load(Ordering::Acquire) {
            0 => None,
            ms => Utc.timestamp_millis_opt(ms).single(),
        }
    }

    /// Gate serialising upstream-backed writers
    pub fn write_gate(&self) -> &Mutex<()> {
        &self.write_gate
    }

    /// Health summary
    pub fn status(&self) -> CacheStatus {
        CacheStatus {
            warm: self.is_warm(),
            size: self.len(),
            generation: self.generation(),
            last_reconciled: self.last_reconciled(),
        }
    }

    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}
