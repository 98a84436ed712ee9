use super::{Academy, Counts};
use crate::core::field::FieldFormat;
use crate::core::resource::{Relation, Resource};
use crate::core::validation::{FieldConstraint, ValidationSchema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account mirrored from the identity provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub email: String,

    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,

    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub roq_user_id: String,

    #[serde(default)]
    pub tenant_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academy: Option<Vec<Academy>>,

    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<Counts>,
}

impl User {
    pub fn new(email: &str, roq_user_id: &str, tenant_id: &str) -> Self {
        Self {
            email: email.to_string(),
            roq_user_id: roq_user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            ..Self::default()
        }
    }
}

impl Resource for User {
    const ENTITY: &'static str = "user";
    const ROUTE: &'static str = "users";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn schema() -> ValidationSchema {
        ValidationSchema::new(Self::ENTITY)
            .field(
                "email",
                FieldConstraint::string()
                    .required()
                    .format(FieldFormat::Email)
                    .max_length(255),
            )
            .field("firstName", FieldConstraint::string().nullable().max_length(255))
            .field("lastName", FieldConstraint::string().nullable().max_length(255))
            .field("roq_user_id", FieldConstraint::string().required())
            .field("tenant_id", FieldConstraint::string().required())
    }

    fn relations() -> Vec<Relation> {
        vec![
            Relation::has_many("academy", "academy", "user_id"),
            Relation::has_many("player_player_user_idTouser", "player", "user_id"),
            Relation::has_many("player_player_coach_idTouser", "player", "coach_id"),
            Relation::has_many("player_player_parent_idTouser", "player", "parent_id"),
        ]
    }
}
