//! Declarative per-entity validation schemas

use super::validators;
use crate::core::error::{FieldErrorKind, FieldValidationError, ValidationError};
use crate::core::field::{FieldFormat, FieldType};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Constraint set for one field
///
/// `required` wins over `nullable`: a required field rejects null even when
/// it is also nullable, and rejects the empty string when it is a string.
#[derive(Debug, Clone, Default)]
pub struct FieldConstraint {
    pub required: bool,
    pub nullable: bool,
    pub field_type: Option<FieldType>,
    pub format: Option<FieldFormat>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl FieldConstraint {
    /// Constraint with a declared type and nothing else
    pub fn of(field_type: FieldType) -> Self {
        Self {
            field_type: Some(field_type),
            ..Self::default()
        }
    }

    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    pub fn integer() -> Self {
        Self::of(FieldType::Integer)
    }

    pub fn number() -> Self {
        Self::of(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::of(FieldType::Boolean)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Check one field; `None` means the field is absent from the payload
    fn check(&self, field: &str, value: Option<&Value>) -> Result<(), FieldValidationError> {
        let value = match value {
            None | Some(Value::Null) if self.required => {
                return Err(missing(field));
            }
            None => return Ok(()),
            Some(Value::Null) if self.nullable => return Ok(()),
            Some(Value::Null) => {
                return Err(FieldValidationError::new(
                    field,
                    FieldErrorKind::NullNotAllowed,
                    format!("'{}' cannot be null", field),
                ));
            }
            Some(Value::String(s)) if s.is_empty() && self.required => {
                return Err(missing(field));
            }
            Some(value) => value,
        };

        if let Some(field_type) = self.field_type {
            validators::of_type(field_type)(field, value)?;
        }
        if let Some(format) = &self.format {
            validators::format(format.clone())(field, value)?;
        }
        if self.min_length.is_some() || self.max_length.is_some() {
            validators::string_length(self.min_length, self.max_length)(field, value)?;
        }
        Ok(())
    }
}

fn missing(field: &str) -> FieldValidationError {
    FieldValidationError::new(
        field,
        FieldErrorKind::MissingField,
        format!("'{}' is required", field),
    )
}

/// Ordered field → constraint mapping for one entity
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    entity_type: String,
    fields: IndexMap<String, FieldConstraint>,
}

impl ValidationSchema {
    pub fn new(entity_type: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            fields: IndexMap::new(),
        }
    }

    /// Declare a field; declaring it again replaces the constraint in place
    pub fn field(mut self, name: &str, constraint: FieldConstraint) -> Self {
        self.fields.insert(name.to_string(), constraint);
        self
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn constraint(&self, name: &str) -> Option<&FieldConstraint> {
        self.fields.get(name)
    }

    /// Declared field names, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Validate a complete payload
    ///
    /// Every declared field is checked. Errors are reported in declaration
    /// order, at most one per field. Undeclared fields are ignored.
    pub fn validate(&self, payload: &Value) -> Result<(), ValidationError> {
        let object = as_object(payload)?;
        let errors: Vec<FieldValidationError> = self
            .fields
            .iter()
            .filter_map(|(name, constraint)| constraint.check(name, object.get(name)).err())
            .collect();
        into_result(errors)
    }

    /// Validate only the fields present in the payload
    ///
    /// Used for partial updates, where absent fields stay unchanged.
    pub fn validate_partial(&self, payload: &Value) -> Result<(), ValidationError> {
        let object = as_object(payload)?;
        let errors: Vec<FieldValidationError> = self
            .fields
            .iter()
            .filter(|(name, _)| object.contains_key(name.as_str()))
            .filter_map(|(name, constraint)| constraint.check(name, object.get(name)).err())
            .collect();
        into_result(errors)
    }
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
    payload
        .as_object()
        .ok_or_else(|| ValidationError::InvalidPayload {
            message: format!(
                "expected a JSON object, got {}",
                crate::core::field::json_type_name(payload)
            ),
        })
}

fn into_result(errors: Vec<FieldValidationError>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::FieldErrors(errors))
    }
}
