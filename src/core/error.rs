//! Typed error handling for this-admin
//!
//! Every failure a page controller can observe is an [`AdminError`], so
//! callers match on the category instead of inspecting strings.
//!
//! # Error Categories
//!
//! - [`AdminError::Validation`]: payload rejected, either by the local schema
//!   check or by the server
//! - [`AdminError::NotFound`]: missing id on get/update/delete
//! - [`AdminError::AccessDenied`]: guard refused the action, nothing was sent
//! - [`AdminError::Network`]: transport failure
//! - [`AdminError::Server`]: 5xx or any other unexpected response
//! - [`AdminError::Config`]: startup configuration could not be loaded
//!
//! # Example
//!
//! ```rust,ignore
//! match players.delete(&id).await {
//!     Ok(()) | Err(AdminError::NotFound { .. }) => page.load().await,
//!     Err(e) => show_banner(e),
//! }
//! ```

use crate::core::auth::AccessOperation;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The main error type for this-admin
#[derive(Debug, Clone)]
pub enum AdminError {
    /// Payload failed validation (client pre-check or server rejection)
    Validation(ValidationError),

    /// No record with this id
    NotFound { entity_type: String, id: String },

    /// Entity type is not served by the API
    UnknownEntity { entity_type: String },

    /// Access guard refused the action; it was not attempted
    AccessDenied {
        entity_type: String,
        operation: AccessOperation,
        reason: String,
    },

    /// Transport failure (connection refused, timeout, reset)
    Network { message: String },

    /// 5xx or unexpected response from the API
    Server { status: Option<u16>, message: String },

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::Validation(e) => write!(f, "{}", e),
            AdminError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            AdminError::UnknownEntity { entity_type } => {
                write!(f, "Unknown entity type: {}", entity_type)
            }
            AdminError::AccessDenied {
                entity_type,
                operation,
                reason,
            } => write!(
                f,
                "Access denied: {} on {} ({})",
                operation, entity_type, reason
            ),
            AdminError::Network { message } => write!(f, "Network error: {}", message),
            AdminError::Server {
                status: Some(status),
                message,
            } => write!(f, "Server error ({}): {}", status, message),
            AdminError::Server {
                status: None,
                message,
            } => write!(f, "Server error: {}", message),
            AdminError::Config(e) => write!(f, "{}", e),
            AdminError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdminError::Validation(e) => Some(e),
            AdminError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Error body exchanged with the API
///
/// The mock API renders every [`AdminError`] this way, and the resource
/// client parses it back when a request fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AdminError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AdminError::NotFound { .. } => StatusCode::NOT_FOUND,
            AdminError::UnknownEntity { .. } => StatusCode::NOT_FOUND,
            AdminError::AccessDenied { .. } => StatusCode::FORBIDDEN,
            AdminError::Network { .. } => StatusCode::BAD_GATEWAY,
            AdminError::Server { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AdminError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::Validation(_) => "VALIDATION_ERROR",
            AdminError::NotFound { .. } => "ENTITY_NOT_FOUND",
            AdminError::UnknownEntity { .. } => "UNKNOWN_ENTITY_TYPE",
            AdminError::AccessDenied { .. } => "ACCESS_DENIED",
            AdminError::Network { .. } => "NETWORK_ERROR",
            AdminError::Server { .. } => "SERVER_ERROR",
            AdminError::Config(_) => "CONFIG_ERROR",
            AdminError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AdminError::NotFound { entity_type, id } => Some(serde_json::json!({
                "entity_type": entity_type,
                "id": id,
            })),
            AdminError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }

    /// Whether this is a missing-record failure
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AdminError::NotFound { .. } | AdminError::UnknownEntity { .. }
        )
    }

    /// Per-field errors carried by a validation failure, if any
    pub fn field_errors(&self) -> &[FieldValidationError] {
        match self {
            AdminError::Validation(ValidationError::FieldErrors(errors)) => errors,
            _ => &[],
        }
    }

    /// Build the error for a non-success API response
    ///
    /// `body` is parsed as an [`ErrorResponse`] when possible so that server
    /// field errors reach the form the same way local ones do.
    pub fn from_response(
        status: StatusCode,
        entity_type: &str,
        operation: AccessOperation,
        id: Option<&str>,
        body: &str,
    ) -> Self {
        let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
        let message = parsed
            .as_ref()
            .map(|r| r.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            });

        match status {
            StatusCode::NOT_FOUND => AdminError::NotFound {
                entity_type: entity_type.to_string(),
                id: id.unwrap_or_default().to_string(),
            },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let fields = parsed
                    .and_then(|r| r.details)
                    .and_then(|d| d.get("fields").cloned())
                    .and_then(|f| serde_json::from_value::<Vec<FieldValidationError>>(f).ok())
                    .filter(|f| !f.is_empty());
                match fields {
                    Some(fields) => AdminError::Validation(ValidationError::FieldErrors(fields)),
                    None => AdminError::Validation(ValidationError::Rejected { message }),
                }
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AdminError::AccessDenied {
                entity_type: entity_type.to_string(),
                operation,
                reason: message,
            },
            other => AdminError::Server {
                status: Some(other.as_u16()),
                message,
            },
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to payload validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Per-field errors, in schema declaration order
    FieldErrors(Vec<FieldValidationError>),

    /// Payload is not a JSON object
    InvalidPayload { message: String },

    /// Payload could not be (de)serialized
    InvalidJson { message: String },

    /// Server refused the payload without field details
    Rejected { message: String },
}

/// What went wrong with a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    MissingField,
    TypeMismatch,
    NullNotAllowed,
    InvalidFormat,
    TooShort,
    TooLong,
    /// Reported by the server without a local classification
    #[default]
    Rejected,
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValidationError {
    pub field: String,
    #[serde(default)]
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: &str, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl ValidationError {
    /// Errors attached to one field
    pub fn errors_for<'a>(
        &'a self,
        field: &'a str,
    ) -> impl Iterator<Item = &'a FieldValidationError> + 'a {
        let errors: &[FieldValidationError] = match self {
            ValidationError::FieldErrors(errors) => errors,
            _ => &[],
        };
        errors.iter().filter(move |e| e.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidPayload { message } => {
                write!(f, "Invalid payload: {}", message)
            }
            ValidationError::InvalidJson { message } => write!(f, "Invalid JSON: {}", message),
            ValidationError::Rejected { message } => {
                write!(f, "Payload rejected: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for AdminError {
    fn from(err: ValidationError) -> Self {
        AdminError::Validation(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for AdminError {
    fn from(err: ConfigError) -> Self {
        AdminError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        AdminError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        AdminError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for AdminError {
    fn from(err: serde_yaml::Error) -> Self {
        AdminError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AdminError::Server {
                status: err.status().map(|s| s.as_u16()),
                message: format!("undecodable response body: {}", err),
            }
        } else if let Some(status) = err.status() {
            AdminError::Server {
                status: Some(status.as_u16()),
                message: err.to_string(),
            }
        } else {
            AdminError::Network {
                message: err.to_string(),
            }
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for this-admin operations
pub type AdminResult<T> = Result<T, AdminError>;
