//! Field types and formats used by validation schemas

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

/// Runtime JSON type a field is declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    /// Whether a (non-null) value has this type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the runtime type of a JSON value
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// String formats checked after the type constraint
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Email,
    Uuid,
    Url,
    Custom(Regex),
}

impl FieldFormat {
    /// Validate a string against this format
    pub fn validate(&self, value: &str) -> bool {
        match self {
            FieldFormat::Email => Self::is_valid_email(value),
            FieldFormat::Uuid => Uuid::parse_str(value).is_ok(),
            FieldFormat::Url => Self::is_valid_url(value),
            FieldFormat::Custom(regex) => regex.is_match(value),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldFormat::Email => "email",
            FieldFormat::Uuid => "uuid",
            FieldFormat::Url => "url",
            FieldFormat::Custom(regex) => regex.as_str(),
        }
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
        EMAIL_REGEX
            .get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok())
            .as_ref()
            .is_some_and(|regex| regex.is_match(email))
    }

    fn is_valid_url(url: &str) -> bool {
        static URL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
        URL_REGEX
            .get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").ok())
            .as_ref()
            .is_some_and(|regex| regex.is_match(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_matches() {
        assert!(FieldType::String.matches(&json!("x")));
        assert!(!FieldType::String.matches(&json!(1)));
        assert!(FieldType::Integer.matches(&json!(42)));
        assert!(!FieldType::Integer.matches(&json!(4.2)));
        assert!(FieldType::Number.matches(&json!(4.2)));
        assert!(FieldType::Number.matches(&json!(4)));
        assert!(FieldType::Boolean.matches(&json!(false)));
        assert!(FieldType::Array.matches(&json!([])));
        assert!(FieldType::Object.matches(&json!({})));
        assert!(!FieldType::Object.matches(&json!(null)));
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(1)), "integer");
        assert_eq!(json_type_name(&json!(1.5)), "number");
        assert_eq!(json_type_name(&json!("a")), "string");
        assert_eq!(json_type_name(&json!([1])), "array");
    }

    #[test]
    fn test_email_validation() {
        let format = FieldFormat::Email;
        assert!(format.validate("coach@academy.com"));
        assert!(format.validate("user.name+tag@example.co.uk"));
        assert!(!format.validate("invalid-email"));
        assert!(!format.validate("@example.com"));
    }

    #[test]
    fn test_uuid_validation() {
        let format = FieldFormat::Uuid;
        assert!(format.validate(&Uuid::new_v4().to_string()));
        assert!(!format.validate("not-a-uuid"));
    }

    #[test]
    fn test_url_validation() {
        let format = FieldFormat::Url;
        assert!(format.validate("https://cdn.example.com/logo.png"));
        assert!(!format.validate("not a url"));
    }

    #[test]
    fn test_custom_regex_validation() {
        let format = FieldFormat::Custom(Regex::new(r"^[A-Z]{3}\d{3}$").expect("valid regex"));
        assert!(format.validate("ABC123"));
        assert!(!format.validate("abc123"));
        assert_eq!(format.name(), r"^[A-Z]{3}\d{3}$");
    }
}
