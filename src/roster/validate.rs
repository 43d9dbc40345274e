//! Input checks shared by the roster operations.

use super::types::{FieldError, RosterError, StudentView};

/// Largest id accepted by the delete operation.
pub const MAX_DELETE_ID: i64 = 100;

/// Reject non-positive identifiers.
pub fn require_positive_id(id: i64) -> Result<i64, RosterError> {
    if id <= 0 {
        return Err(RosterError::InvalidInput(format!(
            "id must be greater than zero, got {id}"
        )));
    }
    Ok(id)
}

/// Reject identifiers outside `1..=MAX_DELETE_ID`.
pub fn require_deletable_id(id: i64) -> Result<i64, RosterError> {
    if !(1..=MAX_DELETE_ID).contains(&id) {
        return Err(RosterError::InvalidInput(format!(
            "id must be between 1 and {MAX_DELETE_ID}, got {id}"
        )));
    }
    Ok(id)
}

/// Reject empty or non-alphabetic name keys.
pub fn require_name(name: &str) -> Result<&str, RosterError> {
    if name.is_empty() {
        return Err(RosterError::InvalidInput("name must not be empty".into()));
    }
    if !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(RosterError::InvalidInput(format!(
            "name must be alphabetic, got '{name}'"
        )));
    }
    Ok(name)
}

/// Reject a missing payload.
pub fn require_payload<T>(payload: Option<T>) -> Result<T, RosterError> {
    payload.ok_or_else(|| RosterError::InvalidInput("request body must not be null".into()))
}

/// Check the required fields of a view, collecting every violation.
pub fn validate_view(view: &StudentView) -> Result<(), RosterError> {
    let errors: Vec<FieldError> = [
        ("studentName", &view.student_name),
        ("email", &view.email),
        ("address", &view.address),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| FieldError::new(field, format!("the {field} field is required")))
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(RosterError::Validation(errors))
    }
}
