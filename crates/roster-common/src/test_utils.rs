//! Test fixtures shared across the workspace.
//!
//! Enabled for this crate's own tests and for dependents through the
//! `testing` feature.

use crate::types::{Employee, EmployeeDraft};

/// Builds an employee whose email is derived from its name.
pub fn employee(id: &str, name: &str, salary: u32) -> Employee {
    let email = format!("{}@company.com", name.to_lowercase().replace(' ', "."));
    Employee::new(id, name, salary, 30, "Engineer", Some(email))
}

/// The two-employee roster used throughout the service tests.
pub fn john_and_jane() -> Vec<Employee> {
    vec![
        Employee::new(
            "1",
            "John Doe",
            50_000,
            30,
            "Software Engineer",
            Some("johndoe@company.com".to_string()),
        ),
        Employee::new(
            "2",
            "Jane Doe",
            60_000,
            28,
            "Product Manager",
            Some("janedoe@company.com".to_string()),
        ),
    ]
}

/// A roster of `count` employees with salaries `1_000, 2_000, ...`.
pub fn numbered_roster(count: usize) -> Vec<Employee> {
    (1..=count)
        .map(|i| employee(&format!("emp-{i}"), &format!("Employee {i}"), (i as u32) * 1_000))
        .collect()
}

/// A valid create payload.
pub fn draft(name: &str, salary: u32) -> EmployeeDraft {
    EmployeeDraft::new(name, salary, 24, "Software Engineer")
}
