//! In-memory upstream for tests.
//!
//! Enabled for this crate's own tests and for dependents through the
//! `testing` feature.

use async_trait::async_trait;
use roster_common::{Employee, EmployeeDraft, Result, RosterError};
use roster_upstream::EmployeeUpstream;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// An upstream that keeps its employees in memory.
///
/// Listing and mutations can be switched to fail independently. Created
/// employees get ids `fake-1`, `fake-2`, ... and a company email.
#[derive(Debug, Default)]
pub struct FakeUpstream {
    employees: Mutex<Vec<Employee>>,
    fail_listing: AtomicBool,
    mutation_failure: Mutex<Option<Option<u16>>>,
    list_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeUpstream {
    /// Upstream holding `employees`
    pub fn with_employees(employees: Vec<Employee>) -> Self {
        Self {
            employees: Mutex::new(employees),
            ..Default::default()
        }
    }

    /// Replace the upstream roster
    pub fn set_employees(&self, employees: Vec<Employee>) {
        *self.employees.lock().unwrap() = employees;
    }

    /// Current upstream roster
    pub fn employees(&self) -> Vec<Employee> {
        self.employees.lock().unwrap().clone()
    }

    /// Make `list_all` fail with a transport error
    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Make `create` and `delete` fail.
    ///
    /// `Some(Some(status))` answers with that HTTP status, `Some(None)` fails
    /// as a transport error, `None` restores normal behaviour.
    pub fn fail_mutations(&self, failure: Option<Option<u16>>) {
        *self.mutation_failure.lock().unwrap() = failure;
    }

    /// Number of `list_all` calls so far
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn mutation_error(&self) -> Option<RosterError> {
        self.mutation_failure.lock().unwrap().map(|status| match status {
            Some(code) => RosterError::upstream_with_status(format!("Upstream answered {code}"), code),
            None => RosterError::upstream("Connection failed"),
        })
    }
}

#[async_trait]
impl EmployeeUpstream for FakeUpstream {
    async fn list_all(&self) -> Result<Vec<Employee>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(RosterError::upstream("Connection failed"));
        }
        Ok(self.employees())
    }

    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee> {
        if let Some(e) = self.mutation_error() {
            return Err(e);
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let email = format!("{}@company.com", draft.name.to_lowercase().replace(' ', "."));
        let employee = Employee::new(
            format!("fake-{n}"),
            draft.name.clone(),
            draft.salary,
            draft.age,
            draft.title.clone(),
            Some(email),
        );
        self.employees.lock().unwrap().push(employee.clone());
        Ok(employee)
    }

    async fn delete(&self, employee: &Employee) -> Result<()> {
        if let Some(e) = self.mutation_error() {
            return Err(e);
        }

        let mut employees = self.employees.lock().unwrap();
        let before = employees.len();
        employees.retain(|e| e.name() != employee.name());
        if employees.len() == before {
            return Err(RosterError::upstream(format!(
                "No employee named '{}' upstream",
                employee.name()
            )));
        }
        Ok(())
    }
}
