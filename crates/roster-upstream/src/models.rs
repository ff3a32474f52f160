//! Wire models of the upstream employee API

use roster_common::{Employee, EmployeeDraft};
use serde::{Deserialize, Serialize};

/// Response wrapper used by every upstream endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamEnvelope<T> {
    /// The actual payload
    pub data: Option<T>,
    /// Human readable status line
    #[serde(default)]
    pub status: Option<String>,
    /// Error description, present on some failures
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> UpstreamEnvelope<T> {
    /// Take the payload out of the envelope
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Error or status text for log lines
    pub fn describe(&self) -> &str {
        self.error
            .as_deref()
            .or(self.status.as_deref())
            .unwrap_or("no status")
    }
}

/// Body of `POST /employee`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    /// Display name
    pub name: String,
    /// Salary
    pub salary: u32,
    /// Age in years
    pub age: u32,
    /// Job title
    pub title: String,
}

impl From<&EmployeeDraft> for CreateEmployeeRequest {
    fn from(draft: &EmployeeDraft) -> Self {
        Self {
            name: draft.name.clone(),
            salary: draft.salary,
            age: draft.age,
            title: draft.title.clone(),
        }
    }
}

/// Body of `DELETE /employee`; the upstream deletes by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEmployeeRequest {
    /// Name of the employee to delete
    pub name: String,
}

impl From<&Employee> for DeleteEmployeeRequest {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_envelope_deserialization() {
        let json = r#"{
            "data": [
                {
                    "id": "5255f1a5-f9f7-4be5-829a-134bde088d17",
                    "employee_name": "Bill Bob",
                    "employee_salary": 89750,
                    "employee_age": 24,
                    "employee_title": "Documentation Engineer",
                    "employee_email": "billBob@company.com"
                }
            ],
            "status": "Successfully processed request."
        }"#;

        let envelope: UpstreamEnvelope<Vec<Employee>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.describe(), "Successfully processed request.");
        let employees = envelope.into_data().unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].name(), "Bill Bob");
        assert_eq!(employees[0].salary(), 89_750);
    }

    #[test]
    fn test_error_envelope() {
        let envelope: UpstreamEnvelope<bool> =
            serde_json::from_str(r#"{"data": null, "status": "Failed", "error": "Too Many Requests"}"#).unwrap();
        assert_eq!(envelope.describe(), "Too Many Requests");
        assert!(envelope.into_data().is_none());
    }

    #[test]
    fn test_create_request_uses_short_field_names() {
        let draft = EmployeeDraft::new("Raj Kamal", 50_000, 24, "Software Engineer");
        let body = serde_json::to_value(CreateEmployeeRequest::from(&draft)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"name": "Raj Kamal", "salary": 50000, "age": 24, "title": "Software Engineer"})
        );
    }

    #[test]
    fn test_delete_request_carries_name() {
        let employee = Employee::new("9", "Jane Doe", 1, 30, "PM", None);
        let body = serde_json::to_value(DeleteEmployeeRequest::from(&employee)).unwrap();
        assert_eq!(body, serde_json::json!({"name": "Jane Doe"}));
    }
}
