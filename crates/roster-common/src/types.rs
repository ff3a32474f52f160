//! Employee domain types shared by the upstream client, the cache and the HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// Upstream-assigned employee identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Wraps an identifier issued by the upstream.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random identifier for records the upstream sent without one.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EmployeeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EmployeeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// An employee record as known to the upstream.
///
/// Records are immutable: a refresh replaces the whole record rather than
/// patching individual fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default = "EmployeeId::generate")]
    id: EmployeeId,
    employee_name: String,
    employee_salary: u32,
    employee_age: u32,
    employee_title: String,
    #[serde(default)]
    employee_email: Option<String>,
}

impl Employee {
    /// Creates an employee record.
    pub fn new(
        id: impl Into<EmployeeId>,
        name: impl Into<String>,
        salary: u32,
        age: u32,
        title: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            employee_name: name.into(),
            employee_salary: salary,
            employee_age: age,
            employee_title: title.into(),
            employee_email: email,
        }
    }

    /// Identifier.
    pub fn id(&self) -> &EmployeeId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.employee_name
    }

    /// Salary.
    pub fn salary(&self) -> u32 {
        self.employee_salary
    }

    /// Age in years.
    pub fn age(&self) -> u32 {
        self.employee_age
    }

    /// Job title.
    pub fn title(&self) -> &str {
        &self.employee_title
    }

    /// Contact email, when the upstream issued one.
    pub fn email(&self) -> Option<&str> {
        self.employee_email.as_deref()
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Employee{{id={}, name={}, salary={}, age={}, title={}, email={}}}",
            self.id,
            self.employee_name,
            self.employee_salary,
            self.employee_age,
            self.employee_title,
            self.employee_email.as_deref().unwrap_or("-")
        )
    }
}

/// Payload for creating an employee. The upstream assigns id and email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EmployeeDraft {
    /// Display name
    #[serde(rename = "employee_name", alias = "name")]
    #[validate(custom(function = "validate_not_blank", message = "Name must not be blank"))]
    pub name: String,

    /// Salary
    #[serde(rename = "employee_salary", alias = "salary")]
    pub salary: u32,

    /// Age in years
    #[serde(rename = "employee_age", alias = "age")]
    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: u32,

    /// Job title
    #[serde(rename = "employee_title", alias = "title")]
    #[validate(custom(function = "validate_not_blank", message = "Title must not be blank"))]
    pub title: String,
}

impl EmployeeDraft {
    /// Creates a draft.
    pub fn new(name: impl Into<String>, salary: u32, age: u32, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            salary,
            age,
            title: title.into(),
        }
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_deserializes_upstream_shape() {
        let json = r#"{
            "id": "4a3a170b-22cd-4ac2-aad1-9bb5b34a1507",
            "employee_name": "Tiger Nixon",
            "employee_salary": 320800,
            "employee_age": 61,
            "employee_title": "Vice Chair Executive Principal of Chief Operations Implementation Specialist",
            "employee_email": "tnixon@company.com"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id().as_str(), "4a3a170b-22cd-4ac2-aad1-9bb5b34a1507");
        assert_eq!(employee.name(), "Tiger Nixon");
        assert_eq!(employee.salary(), 320_800);
        assert_eq!(employee.age(), 61);
        assert_eq!(employee.email(), Some("tnixon@company.com"));
    }

    #[test]
    fn test_missing_id_is_generated() {
        let json = r#"{
            "employee_name": "Jane Doe",
            "employee_salary": 60000,
            "employee_age": 28,
            "employee_title": "Product Manager"
        }"#;

        let first: Employee = serde_json::from_str(json).unwrap();
        let second: Employee = serde_json::from_str(json).unwrap();
        assert!(!first.id().as_str().is_empty());
        assert_ne!(first.id(), second.id());
        assert_eq!(first.email(), None);
    }

    #[test]
    fn test_employee_serializes_with_id_and_email() {
        let employee = Employee::new("1", "John Doe", 50000, 30, "Software Engineer", Some("johndoe@company.com".into()));
        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["employee_name"], "John Doe");
        assert_eq!(value["employee_email"], "johndoe@company.com");
    }

    #[test]
    fn test_draft_accepts_both_field_spellings() {
        let long: EmployeeDraft = serde_json::from_str(
            r#"{"employee_name":"Raj Kamal","employee_salary":50000,"employee_age":24,"employee_title":"Software Engineer"}"#,
        )
        .unwrap();
        let short: EmployeeDraft =
            serde_json::from_str(r#"{"name":"Raj Kamal","salary":50000,"age":24,"title":"Software Engineer"}"#).unwrap();
        assert_eq!(long, short);
    }

    #[test]
    fn test_draft_validation() {
        assert!(EmployeeDraft::new("Raj Kamal", 50000, 24, "Software Engineer").validate().is_ok());

        let blank_name = EmployeeDraft::new("   ", 50000, 24, "Software Engineer");
        let errors = blank_name.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let zero_age = EmployeeDraft::new("Raj Kamal", 50000, 0, "Software Engineer");
        assert!(zero_age.validate().unwrap_err().field_errors().contains_key("age"));

        let blank_title = EmployeeDraft::new("Raj Kamal", 50000, 24, "");
        assert!(blank_title.validate().unwrap_err().field_errors().contains_key("title"));
    }

    #[test]
    fn test_employee_id_display() {
        let id = EmployeeId::new("abc-123");
        assert_eq!(format!("{id}"), "abc-123");
        assert_eq!(EmployeeId::from("abc-123"), id);
    }
}
