//! Reusable field validators
//!
//! Each validator checks one constraint on a present, non-null value.
//! Presence and nullability are decided by the schema before these run.

use crate::core::error::{FieldErrorKind, FieldValidationError};
use crate::core::field::{FieldFormat, FieldType, json_type_name};
use serde_json::Value;

/// Validator: value has the declared runtime type
pub fn of_type(
    expected: FieldType,
) -> impl Fn(&str, &Value) -> Result<(), FieldValidationError> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if expected.matches(value) {
            Ok(())
        } else {
            Err(FieldValidationError::new(
                field,
                FieldErrorKind::TypeMismatch,
                format!(
                    "'{}' must be a {} (got {})",
                    field,
                    expected,
                    json_type_name(value)
                ),
            ))
        }
    }
}

/// Validator: string matches a format
///
/// Empty strings pass; whether a blank value is acceptable is a presence
/// question.
pub fn format(
    format: FieldFormat,
) -> impl Fn(&str, &Value) -> Result<(), FieldValidationError> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value.as_str() {
        Some(s) if !s.is_empty() && !format.validate(s) => Err(FieldValidationError::new(
            field,
            FieldErrorKind::InvalidFormat,
            format!("'{}' must be a valid {}", field, format.name()),
        )),
        _ => Ok(()),
    }
}

/// Validator: string length within bounds (in characters)
pub fn string_length(
    min: Option<usize>,
    max: Option<usize>,
) -> impl Fn(&str, &Value) -> Result<(), FieldValidationError> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        let Some(s) = value.as_str() else {
            return Ok(());
        };
        let len = s.chars().count();
        if let Some(min) = min.filter(|min| len < *min) {
            return Err(FieldValidationError::new(
                field,
                FieldErrorKind::TooShort,
                format!(
                    "'{}' must have at least {} characters (currently: {})",
                    field, min, len
                ),
            ));
        }
        if let Some(max) = max.filter(|max| len > *max) {
            return Err(FieldValidationError::new(
                field,
                FieldErrorKind::TooLong,
                format!(
                    "'{}' must not exceed {} characters (currently: {})",
                    field, max, len
                ),
            ));
        }
        Ok(())
    }
}
