//! Validation system
//!
//! Schemas declare per-field constraints (required, nullable, type, plus
//! format and length). Checks are advisory: they run before submission so
//! the form can show errors inline, but the server stays authoritative.

pub mod schema;
pub mod validators;

pub use schema::{FieldConstraint, ValidationSchema};

use crate::core::error::ValidationError;
use serde_json::Value;
use std::collections::HashMap;

/// Schemas of every known entity, looked up by entity name
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    schemas: HashMap<String, ValidationSchema>,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its entity type
    pub fn register(&mut self, schema: ValidationSchema) {
        self.schemas.insert(schema.entity_type().to_string(), schema);
    }

    pub fn with_schema(mut self, schema: ValidationSchema) -> Self {
        self.register(schema);
        self
    }

    pub fn schema(&self, entity_type: &str) -> Option<&ValidationSchema> {
        self.schemas.get(entity_type)
    }

    /// Validate a full payload for an entity type
    ///
    /// An entity without a registered schema has no client-side constraints.
    pub fn validate(&self, entity_type: &str, payload: &Value) -> Result<(), ValidationError> {
        match self.schemas.get(entity_type) {
            Some(schema) => schema.validate(payload),
            None => ValidationSchema::new(entity_type).validate(payload),
        }
    }

    /// Validate only the fields present in the payload
    pub fn validate_partial(
        &self,
        entity_type: &str,
        payload: &Value,
    ) -> Result<(), ValidationError> {
        match self.schemas.get(entity_type) {
            Some(schema) => schema.validate_partial(payload),
            None => ValidationSchema::new(entity_type).validate_partial(payload),
        }
    }
}
