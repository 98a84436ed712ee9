//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - API responses map back to the right error variants
//! - Error matching allows callers to handle specific cases

use axum::http::StatusCode;
use axum::response::IntoResponse;
use this_admin::core::error::ConfigError;
use this_admin::prelude::*;

fn not_found() -> AdminError {
    AdminError::NotFound {
        entity_type: "player".to_string(),
        id: "p1".to_string(),
    }
}

fn field_errors() -> AdminError {
    AdminError::Validation(ValidationError::FieldErrors(vec![
        FieldValidationError::new("user_id", FieldErrorKind::MissingField, "'user_id' is required"),
        FieldValidationError::new("coach_id", FieldErrorKind::TypeMismatch, "expected string"),
    ]))
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_not_found_returns_404() {
        assert_eq!(not_found().status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_error_returns_422() {
        assert_eq!(field_errors().status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_access_denied_returns_403() {
        let err = AdminError::AccessDenied {
            entity_type: "player".to_string(),
            operation: AccessOperation::Delete,
            reason: "no".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_server_error_keeps_upstream_status() {
        let err = AdminError::Server {
            status: Some(503),
            message: "maintenance".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = AdminError::Server {
            status: None,
            message: "garbled".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_config_error_returns_500() {
        let err = AdminError::Config(ConfigError::FileNotFound {
            path: "admin.yaml".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Error Response Tests
// =============================================================================

mod error_response_tests {
    use super::*;

    #[test]
    fn test_error_response_has_code_and_message() {
        let response = not_found().to_response();
        assert_eq!(response.code, "ENTITY_NOT_FOUND");
        assert!(response.message.contains("p1"));
    }

    #[test]
    fn test_validation_errors_include_field_details() {
        let response = field_errors().to_response();
        let fields = response.details.unwrap()["fields"].clone();
        assert_eq!(fields[0]["field"], json!("user_id"));
        assert_eq!(fields[0]["kind"], json!("missing_field"));
        assert_eq!(fields[1]["field"], json!("coach_id"));
    }

    #[test]
    fn test_into_response_status() {
        let response = field_errors().into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

// =============================================================================
// API Response Mapping Tests
// =============================================================================

mod from_response_tests {
    use super::*;

    fn map(status: StatusCode, body: &str) -> AdminError {
        AdminError::from_response(status, "player", AccessOperation::Update, Some("p1"), body)
    }

    #[test]
    fn test_404_is_not_found() {
        let err = map(StatusCode::NOT_FOUND, "");
        assert!(matches!(err, AdminError::NotFound { ref id, .. } if id == "p1"));
    }

    #[test]
    fn test_field_errors_round_trip_through_body() {
        let body = serde_json::to_string(&field_errors().to_response()).unwrap();
        let err = map(StatusCode::UNPROCESSABLE_ENTITY, &body);
        assert_eq!(err.field_errors(), field_errors().field_errors());
    }

    #[test]
    fn test_field_errors_without_kind_default_to_rejected() {
        let body = json!({
            "code": "VALIDATION_ERROR",
            "message": "invalid",
            "details": {"fields": [{"field": "user_id", "message": "unknown user"}]}
        })
        .to_string();
        let err = map(StatusCode::BAD_REQUEST, &body);
        assert_eq!(err.field_errors()[0].kind, FieldErrorKind::Rejected);
    }

    #[test]
    fn test_400_without_fields_is_rejected_payload() {
        let err = map(StatusCode::BAD_REQUEST, "not json");
        assert!(matches!(
            err,
            AdminError::Validation(ValidationError::Rejected { .. })
        ));
        assert!(err.field_errors().is_empty());
    }

    #[test]
    fn test_401_and_403_are_access_denied() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = map(status, "");
            assert!(matches!(
                err,
                AdminError::AccessDenied {
                    operation: AccessOperation::Update,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_5xx_is_server_error_with_message() {
        let body = json!({"code": "INTERNAL_ERROR", "message": "database offline"}).to_string();
        let err = map(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            AdminError::Server { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "database offline");
            }
            other => panic!("expected Server, got {other:?}"),
        }
    }
}

// =============================================================================
// Error Conversion Tests
// =============================================================================

mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_serde_json_error_converts() {
        let json_err = serde_json::from_str::<Value>("{ invalid").unwrap_err();
        let err: AdminError = json_err.into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_yaml_error_converts_to_config_error() {
        let yaml_err = serde_yaml::from_str::<AdminConfig>("api: [").unwrap_err();
        let err: AdminError = yaml_err.into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: AdminError = ValidationError::InvalidPayload {
            message: "expected a JSON object".to_string(),
        }
        .into();
        assert!(matches!(err, AdminError::Validation(_)));
    }
}
