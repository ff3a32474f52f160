//! Read-side operations over cache snapshots with a memo for derived views

use crate::sync::CacheSync;
use moka::future::Cache;
use roster_common::{Employee, EmployeeId, Result, RosterError};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Number of names returned by the top earners view unless configured otherwise
pub const DEFAULT_TOP_N: usize = 10;

/// Settings for the derived-view memo
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Size of the top earners view
    pub top_n: usize,
    /// Maximum number of memoised views
    pub memo_capacity: u64,
    /// Lifetime of a memoised view
    pub memo_ttl: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            memo_capacity: 1024,
            memo_ttl: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum ViewKind {
    MaxSalary,
    TopNames(usize),
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::MaxSalary => write!(f, "max_salary"),
            ViewKind::TopNames(n) => write!(f, "top_{n}_names"),
        }
    }
}

/// Memo key; a new cache generation makes every older key unreachable
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
struct ViewKey {
    view: ViewKind,
    generation: u64,
}

#[derive(Debug, Clone)]
enum DerivedView {
    MaxSalary(u32),
    TopNames(Vec<String>),
}

/// Answers every read against a point-in-time snapshot of the cache
#[derive(Debug, Clone)]
pub struct QueryEngine {
    sync: CacheSync,
    memo: Cache<ViewKey, DerivedView>,
    top_n: usize,
}

impl QueryEngine {
    /// Create a query engine over the given synchroniser
    pub fn new(sync: CacheSync, config: QueryConfig) -> Self {
        let memo = Cache::builder()
            .max_capacity(config.memo_capacity)
            .time_to_live(config.memo_ttl)
            .build();

        Self {
            sync,
            memo,
            top_n: config.top_n,
        }
    }

    /// Every employee
    pub async fn all(&self) -> Result<Vec<Employee>> {
        self.sync.all().await
    }

    /// A single employee
    pub async fn by_id(&self, id: &EmployeeId) -> Result<Employee> {
        self.sync.find_by_id(id).await
    }

    /// Employees whose name contains `fragment`, ignoring case
    #[instrument(skip(self))]
    pub async fn by_name_contains(&self, fragment: &str) -> Result<Vec<Employee>> {
        let needle = fragment.to_lowercase();
        let matches: Vec<Employee> = self
            .sync
            .all()
            .await?
            .into_iter()
            .filter(|e| e.name().to_lowercase().contains(&needle))
            .collect();

        if matches.is_empty() {
            return Err(RosterError::not_found(format!(
                "No employees found matching: {fragment}"
            )));
        }
        Ok(matches)
    }

    /// Highest salary, `0` when there are no employees
    pub async fn max_salary(&self) -> Result<u32> {
        match self.derived(ViewKind::MaxSalary).await? {
            DerivedView::MaxSalary(salary) => Ok(salary),
            DerivedView::TopNames(_) => Err(RosterError::new("Derived view type mismatch")),
        }
    }

    /// Names of the `n` best paid employees, highest first
    pub async fn top_n_by_salary(&self, n: usize) -> Result<Vec<String>> {
        match self.derived(ViewKind::TopNames(n)).await? {
            DerivedView::TopNames(names) => Ok(names),
            DerivedView::MaxSalary(_) => Err(RosterError::new("Derived view type mismatch")),
        }
    }

    /// Names of the configured number of best paid employees
    pub async fn top_earner_names(&self) -> Result<Vec<String>> {
        self.top_n_by_salary(self.top_n).await
    }

    async fn derived(&self, view: ViewKind) -> Result<DerivedView> {
        self.sync.ensure_warm().await?;

        // Generation is read before the snapshot so a concurrent mutation can
        // only ever file a fresher result under an older key.
        let key = ViewKey {
            view,
            generation: self.sync.cache().generation(),
        };
        if let Some(hit) = self.memo.get(&key).await {
            debug!("Derived view hit: {} @ {}", view, key.generation);
            return Ok(hit);
        }

        let snapshot = self.sync.cache().snapshot();
        let computed = match view {
            ViewKind::MaxSalary => DerivedView::MaxSalary(max_salary_of(&snapshot)),
            ViewKind::TopNames(n) => DerivedView::TopNames(top_names_of(snapshot, n)),
        };
        debug!("Derived view computed: {} @ {}", view, key.generation);
        self.memo.insert(key, computed.clone()).await;
        Ok(computed)
    }
}

fn max_salary_of(employees: &[Employee]) -> u32 {
    employees.iter().map(Employee::salary).max().unwrap_or(0)
}

/// Stable sort, so equal salaries keep snapshot order
fn top_names_of(mut employees: Vec<Employee>, n: usize) -> Vec<String> {
    employees.sort_by(|a, b| b.salary().cmp(&a.salary()));
    employees
        .into_iter()
        .take(n)
        .map(|e| e.name().to_string())
        .collect()
}
