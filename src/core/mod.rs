//! Core module containing the fundamental types of the admin CRUD layer

pub mod auth;
pub mod entity_registry;
pub mod error;
pub mod field;
pub mod query;
pub mod resource;
pub mod validation;

pub use auth::{
    AccessContext, AccessGuard, AccessOperation, AccessService, AllowAll, AuthPolicy, DenyAll,
    PolicyGuard, Subject,
};
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use error::{AdminError, AdminResult, FieldErrorKind, FieldValidationError, ValidationError};
pub use field::{FieldFormat, FieldType};
pub use query::QueryDescriptor;
pub use resource::{ListColumn, Relation, RelationKind, Resource, ResourceService};
pub use validation::{FieldConstraint, SchemaValidator, ValidationSchema};
