//! Refresh Scheduler - periodic reconciliation of the employee cache
//!
//! One background task refreshes immediately on start and then once per
//! interval until it is stopped.

use crate::sync::CacheSync;
use roster_common::{Result, RosterError};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

struct RunningTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Drives [`CacheSync::refresh`] on a fixed interval
pub struct RefreshScheduler {
    sync: CacheSync,
    interval: Duration,
    task: Mutex<Option<RunningTask>>,
}

impl RefreshScheduler {
    /// Create a scheduler; nothing runs until [`RefreshScheduler::start`]
    pub fn new(sync: CacheSync, interval: Duration) -> Self {
        Self {
            sync,
            interval,
            task: Mutex::new(None),
        }
    }

    /// Refresh interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the refresh loop.
    ///
    /// The first refresh happens right away but start-up does not wait for
    /// it. Starting an already running scheduler is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero interval.
    pub async fn start(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(RosterError::config("Refresh interval must be greater than zero"));
        }

        let mut task = self.task.lock().await;
        if task.is_some() {
            warn!("Refresh scheduler is already running");
            return Ok(());
        }

        info!("Starting refresh scheduler (interval: {:?})", self.interval);

        let token = CancellationToken::new();
        let handle = tokio::spawn(refresh_loop(self.sync.clone(), self.interval, token.clone()));
        *task = Some(RunningTask { token, handle });

        Ok(())
    }

    /// Cancel the refresh loop and wait for it to finish
    pub async fn stop(&self) {
        let Some(RunningTask { token, handle }) = self.task.lock().await.take() else {
            warn!("Refresh scheduler is not running");
            return;
        };

        info!("Stopping refresh scheduler");
        token.cancel();
        if let Err(e) = handle.await {
            warn!("Refresh task ended abnormally: {}", e);
        }
        info!("Refresh scheduler stopped");
    }

    /// Whether the refresh loop is running
    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }
}

async fn refresh_loop(sync: CacheSync, interval: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        debug!("Scheduled employee cache refresh");
        tokio::select! {
            _ = token.cancelled() => break,
            result = sync.refresh() => {
                if let Err(e) = result {
                    warn!("Scheduled refresh failed: {}", e);
                }
            }
        }
    }

    debug!("Refresh loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EmployeeCache;
    use crate::mutation::MutationCoordinator;
    use crate::test_utils::FakeUpstream;
    use async_trait::async_trait;
    use roster_common::test_utils::{draft, employee, john_and_jane};
    use roster_common::{Employee, EmployeeDraft};
    use roster_upstream::EmployeeUpstream;
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Upstream whose listing never answers
    #[derive(Default)]
    struct StalledListing {
        listing_started: Notify,
    }

    #[async_trait]
    impl EmployeeUpstream for StalledListing {
        async fn list_all(&self) -> Result<Vec<Employee>> {
            self.listing_started.notify_one();
            std::future::pending().await
        }

        async fn create(&self, draft: &EmployeeDraft) -> Result<Employee> {
            Ok(Employee::new(
                "created-1",
                draft.name.clone(),
                draft.salary,
                draft.age,
                draft.title.clone(),
                None,
            ))
        }

        async fn delete(&self, _employee: &Employee) -> Result<()> {
            Ok(())
        }
    }

    fn scheduler_over(upstream: Arc<FakeUpstream>, interval: Duration) -> (RefreshScheduler, Arc<EmployeeCache>) {
        let cache = Arc::new(EmployeeCache::new());
        let sync = CacheSync::new(cache.clone(), upstream);
        (RefreshScheduler::new(sync, interval), cache)
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached in time");
    }

    #[tokio::test]
    async fn test_start_refreshes_immediately() {
        let upstream = Arc::new(FakeUpstream::with_employees(john_and_jane()));
        let (scheduler, cache) = scheduler_over(upstream, Duration::from_secs(3600));

        scheduler.start().await.unwrap();
        assert!(scheduler.is_running().await);

        wait_until(|| cache.is_warm()).await;
        assert_eq!(cache.len(), 2);

        scheduler.stop().await;
        assert!(!scheduler.is_running().await);
    }

    #[tokio::test]
    async fn test_periodic_refresh_picks_up_changes() {
        let upstream = Arc::new(FakeUpstream::with_employees(john_and_jane()));
        let (scheduler, cache) = scheduler_over(upstream.clone(), Duration::from_millis(20));

        scheduler.start().await.unwrap();
        wait_until(|| cache.len() == 2).await;

        upstream.set_employees(vec![employee("7", "Newcomer", 1)]);
        wait_until(|| cache.len() == 1 && cache.find_by_id(&"7".into()).is_ok()).await;

        scheduler.stop().await;
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_loop_alive() {
        let upstream = Arc::new(FakeUpstream::with_employees(john_and_jane()));
        upstream.fail_listing(true);
        let (scheduler, cache) = scheduler_over(upstream.clone(), Duration::from_millis(20));

        scheduler.start().await.unwrap();
        wait_until(|| upstream.list_calls() >= 2).await;
        assert!(!cache.is_warm());

        upstream.fail_listing(false);
        wait_until(|| cache.is_warm()).await;
        assert!(scheduler.is_running().await);

        scheduler.stop().await;
    }

    #[tokio::test]
    async fn test_double_start_and_stop_are_noops() {
        let upstream = Arc::new(FakeUpstream::default());
        let (scheduler, _) = scheduler_over(upstream, Duration::from_secs(60));

        scheduler.stop().await;
        scheduler.start().await.unwrap();
        scheduler.start().await.unwrap();
        assert!(scheduler.is_running().await);
        scheduler.stop().await;
        scheduler.stop().await;
        assert!(!scheduler.is_running().await);
    }

    #[tokio::test]
    async fn test_stop_during_refresh_releases_write_gate() {
        let upstream = Arc::new(StalledListing::default());
        let cache = Arc::new(EmployeeCache::new());
        let sync = CacheSync::new(cache.clone(), upstream.clone());
        let scheduler = RefreshScheduler::new(sync.clone(), Duration::from_secs(3600));

        scheduler.start().await.unwrap();
        upstream.listing_started.notified().await;
        assert!(cache.write_gate().try_lock().is_err());

        tokio::time::timeout(Duration::from_secs(2), scheduler.stop())
            .await
            .expect("stop should not wait for the stalled listing");
        assert!(!scheduler.is_running().await);

        let created = tokio::time::timeout(
            Duration::from_secs(2),
            MutationCoordinator::new(sync).create_employee(draft("After Stop", 1)),
        )
        .await
        .expect("write gate should be free after stop")
        .unwrap();
        assert_eq!(cache.find_by_id(created.id()).unwrap().name(), "After Stop");
        assert!(!cache.is_warm());
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let upstream = Arc::new(FakeUpstream::default());
        let (scheduler, _) = scheduler_over(upstream, Duration::ZERO);

        let err = scheduler.start().await.unwrap_err();
        assert!(matches!(err, RosterError::Config { .. }));
        assert!(!scheduler.is_running().await);
    }
}
