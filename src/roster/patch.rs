//! JSON Patch support for partial student updates.
//!
//! Operations follow RFC 6902 naming (`add`, `remove`, `replace`, `move`, `copy`, `test`) but
//! target the flat [`StudentView`] only: every `path`/`from` names a single top-level field such
//! as `/studentName`. Field names match case-insensitively.

use serde::Deserialize;
use serde_json::Value;

use super::types::{FieldError, StudentView};

/// Operation kind of a single patch entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    /// Set the target field (equivalent to `replace` on a fixed-shape view).
    Add,
    /// Reset the target field to its default.
    Remove,
    /// Set the target field.
    Replace,
    /// Copy `from` into `path`, then reset `from`.
    Move,
    /// Copy `from` into `path`.
    Copy,
    /// Assert the target field equals `value`.
    Test,
}

/// One entry of a patch document.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchOperation {
    /// Operation kind.
    pub op: PatchOp,
    /// Target field pointer, e.g. `/studentName`.
    pub path: String,
    /// Operand for `add`, `replace`, and `test`.
    #[serde(default)]
    pub value: Option<Value>,
    /// Source pointer for `move` and `copy`.
    #[serde(default)]
    pub from: Option<String>,
}

#[cfg(test)]
impl PatchOperation {
    fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: Some(value.into()),
            from: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewField {
    Id,
    StudentName,
    Email,
    Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Int(i64),
    Text(String),
}

impl ViewField {
    fn parse(pointer: &str) -> Result<Self, FieldError> {
        let Some(name) = pointer.strip_prefix('/') else {
            return Err(FieldError::new(pointer, "path must start with '/'"));
        };
        match name.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "studentname" => Ok(Self::StudentName),
            "email" => Ok(Self::Email),
            "address" => Ok(Self::Address),
            _ => Err(FieldError::new(
                name,
                format!("the target location specified by path '{pointer}' was not found"),
            )),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::StudentName => "studentName",
            Self::Email => "email",
            Self::Address => "address",
        }
    }

    fn get(self, view: &StudentView) -> FieldValue {
        match self {
            Self::Id => FieldValue::Int(view.id),
            Self::StudentName => FieldValue::Text(view.student_name.clone()),
            Self::Email => FieldValue::Text(view.email.clone()),
            Self::Address => FieldValue::Text(view.address.clone()),
        }
    }

    fn set(self, view: &mut StudentView, value: FieldValue) -> Result<(), FieldError> {
        match (self, value) {
            (Self::Id, FieldValue::Int(id)) => view.id = id,
            (Self::StudentName, FieldValue::Text(text)) => view.student_name = text,
            (Self::Email, FieldValue::Text(text)) => view.email = text,
            (Self::Address, FieldValue::Text(text)) => view.address = text,
            (field, _) => {
                return Err(FieldError::new(
                    field.name(),
                    "value type does not match the target field",
                ));
            }
        }
        Ok(())
    }

    fn default_value(self) -> FieldValue {
        match self {
            Self::Id => FieldValue::Int(0),
            _ => FieldValue::Text(String::new()),
        }
    }

    /// Convert a JSON operand to this field's type. `null` or a missing operand maps to the default.
    fn coerce(self, value: Option<&Value>) -> Result<FieldValue, FieldError> {
        let invalid = || {
            FieldError::new(
                self.name(),
                format!("the value '{}' is invalid for target location", display(value)),
            )
        };
        match (self, value) {
            (_, None | Some(Value::Null)) => Ok(self.default_value()),
            (Self::Id, Some(Value::Number(number))) => {
                number.as_i64().map(FieldValue::Int).ok_or_else(invalid)
            }
            (Self::Id, Some(Value::String(text))) => {
                text.trim().parse().map(FieldValue::Int).map_err(|_| invalid())
            }
            (Self::Id, Some(_)) => Err(invalid()),
            (_, Some(Value::String(text))) => Ok(FieldValue::Text(text.clone())),
            (_, Some(_)) => Err(invalid()),
        }
    }
}

fn display(value: Option<&Value>) -> String {
    value.map_or_else(|| "null".to_string(), Value::to_string)
}

/// Apply `operations` in order to `view`.
///
/// Application stops at the first failing operation; `view` may already reflect the operations
/// that preceded it, so callers should patch a transient copy.
pub fn apply_patch(view: &mut StudentView, operations: &[PatchOperation]) -> Result<(), FieldError> {
    for operation in operations {
        apply_operation(view, operation)?;
    }
    Ok(())
}

fn apply_operation(view: &mut StudentView, operation: &PatchOperation) -> Result<(), FieldError> {
    let target = ViewField::parse(&operation.path)?;
    match operation.op {
        PatchOp::Add | PatchOp::Replace => {
            let value = target.coerce(operation.value.as_ref())?;
            target.set(view, value)
        }
        PatchOp::Remove => target.set(view, target.default_value()),
        PatchOp::Copy | PatchOp::Move => {
            let Some(from) = operation.from.as_deref() else {
                return Err(FieldError::new(
                    target.name(),
                    "'from' is required for copy and move operations",
                ));
            };
            let source = ViewField::parse(from)?;
            let value = source.get(view);
            if operation.op == PatchOp::Move && source != target {
                source.set(view, source.default_value())?;
            }
            target.set(view, value)
        }
        PatchOp::Test => {
            let expected = target.coerce(operation.value.as_ref())?;
            if target.get(view) == expected {
                Ok(())
            } else {
                Err(FieldError::new(
                    target.name(),
                    format!(
                        "the current value does not match the test value '{}'",
                        display(operation.value.as_ref())
                    ),
                ))
            }
        }
    }
}
