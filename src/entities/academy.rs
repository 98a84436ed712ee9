use super::User;
use crate::core::field::FieldFormat;
use crate::core::query::QueryDescriptor;
use crate::core::resource::{ListColumn, Relation, Resource};
use crate::core::validation::{FieldConstraint, ValidationSchema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An academy, owned by a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Academy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub image: Option<String>,

    pub name: String,

    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub tenant_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<User>>,
}

impl Academy {
    pub fn new(name: &str, user_id: &str, tenant_id: &str) -> Self {
        Self {
            name: name.to_string(),
            user_id: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            ..Self::default()
        }
    }
}

impl Resource for Academy {
    const ENTITY: &'static str = "academy";
    const ROUTE: &'static str = "academies";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn schema() -> ValidationSchema {
        ValidationSchema::new(Self::ENTITY)
            .field("description", FieldConstraint::string().nullable())
            .field(
                "image",
                FieldConstraint::string().nullable().format(FieldFormat::Url),
            )
            .field("name", FieldConstraint::string().required().max_length(255))
            .field("user_id", FieldConstraint::string().required())
            .field("tenant_id", FieldConstraint::string().required())
    }

    fn relations() -> Vec<Relation> {
        vec![Relation::belongs_to("user", "user", "user_id")]
    }

    fn list_query() -> QueryDescriptor {
        QueryDescriptor::with_relations(["user"])
    }

    fn list_columns() -> Vec<ListColumn> {
        vec![ListColumn::new("user", "user", "/user/email")]
    }
}
