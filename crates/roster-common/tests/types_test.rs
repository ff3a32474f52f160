//! Integration tests for the shared employee types.

use roster_common::{Employee, EmployeeDraft, EmployeeId, RosterError};
use validator::Validate;

#[test]
fn test_employee_wire_format() {
    let employee = Employee::new("42", "Ada Lovelace", 120_000, 36, "Engineer", Some("ada@company.com".into()));

    let value = serde_json::to_value(&employee).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "id": "42",
            "employee_name": "Ada Lovelace",
            "employee_salary": 120000,
            "employee_age": 36,
            "employee_title": "Engineer",
            "employee_email": "ada@company.com"
        })
    );
}

#[test]
fn test_employee_without_id_gets_one() {
    let json = r#"{"employee_name": "No Id", "employee_salary": 1, "employee_age": 20, "employee_title": "Intern"}"#;

    let first: Employee = serde_json::from_str(json).unwrap();
    let second: Employee = serde_json::from_str(json).unwrap();

    assert!(!first.id().as_str().is_empty());
    assert_ne!(first.id(), second.id());
    assert_eq!(first.email(), None);
}

#[test]
fn test_negative_salary_is_rejected_on_decode() {
    let json = r#"{"id": "1", "employee_name": "X", "employee_salary": -5, "employee_age": 20, "employee_title": "T"}"#;
    assert!(serde_json::from_str::<Employee>(json).is_err());
}

#[test]
fn test_draft_validation_feeds_error_taxonomy() {
    let draft = EmployeeDraft::new("Valid Name", 10, 200, "Title");

    let err: RosterError = draft.validate().unwrap_err().into();

    match err {
        RosterError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("age")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_employee_id_display() {
    assert_eq!(EmployeeId::new("abc").to_string(), "abc");
    assert_eq!(EmployeeId::from("abc"), EmployeeId::new(String::from("abc")));
}
