//! Core data types and error definitions for the student roster.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Student record owned by the [`crate::roster::StudentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Identifier assigned by the store on creation.
    pub id: i64,
    /// Display name used for name lookups (exact, case-sensitive).
    pub student_name: String,
    /// Contact email address. Not format-checked.
    pub email: String,
    /// Postal address.
    pub address: String,
}

/// External representation of a student, used for request and response bodies.
///
/// Missing text fields deserialize as empty strings and a missing `id` as `0`, so a create
/// payload may omit the identifier entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    /// Student identifier (ignored on create).
    #[serde(default)]
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub student_name: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Contact email address.
    #[serde(default)]
    pub email: String,
}

impl From<&Student> for StudentView {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            student_name: student.student_name.clone(),
            address: student.address.clone(),
            email: student.email.clone(),
        }
    }
}

impl Student {
    /// Build a student from a view, assigning the provided identifier.
    pub fn from_view(id: i64, view: StudentView) -> Self {
        Self {
            id,
            student_name: view.student_name,
            email: view.email,
            address: view.address,
        }
    }

    /// Overwrite the mutable fields from a view. The identifier is left untouched.
    pub fn apply_view(&mut self, view: &StudentView) {
        self.student_name.clone_from(&view.student_name);
        self.email.clone_from(&view.email);
        self.address.clone_from(&view.address);
    }
}

/// Field-level failure reported by patch application or validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// View field (JSON name) the failure refers to.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl FieldError {
    /// Convenience constructor.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors emitted by roster operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    /// Caller supplied a malformed or out-of-range id or name, or a null payload.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// No student matched the lookup key.
    #[error("{0}")]
    NotFound(String),
    /// Patch application or post-patch validation failed.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
}

impl RosterError {
    pub(crate) fn id_not_found(id: i64) -> Self {
        Self::NotFound(format!("the student with the id {id} is not found"))
    }

    pub(crate) fn name_not_found(name: &str) -> Self {
        Self::NotFound(format!("the student with the name {name} is not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn view_uses_camel_case_field_names() {
        let view = StudentView {
            id: 7,
            student_name: "Maya".into(),
            address: "tyre, Lebanon".into(),
            email: "maya@example.org".into(),
        };
        let value = serde_json::to_value(&view).expect("serialize view");
        assert_eq!(
            value,
            json!({
                "id": 7,
                "studentName": "Maya",
                "address": "tyre, Lebanon",
                "email": "maya@example.org"
            })
        );
    }

    #[test]
    fn view_defaults_missing_fields() {
        let view: StudentView =
            serde_json::from_value(json!({ "studentName": "Omar" })).expect("deserialize view");
        assert_eq!(view.id, 0);
        assert_eq!(view.student_name, "Omar");
        assert!(view.email.is_empty());
        assert!(view.address.is_empty());
    }

    #[test]
    fn apply_view_keeps_identifier() {
        let mut student = Student {
            id: 4,
            student_name: "old".into(),
            email: "old@example.org".into(),
            address: "old street".into(),
        };
        let view = StudentView {
            id: 99,
            student_name: "new".into(),
            address: "new street".into(),
            email: "new@example.org".into(),
        };
        student.apply_view(&view);
        assert_eq!(student.id, 4);
        assert_eq!(student.student_name, "new");
        assert_eq!(student.email, "new@example.org");
        assert_eq!(student.address, "new street");
    }
}
