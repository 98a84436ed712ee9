use super::Player;
use crate::core::query::QueryDescriptor;
use crate::core::resource::{ListColumn, Relation, Resource};
use crate::core::validation::{FieldConstraint, ValidationSchema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form notes attached to a player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    pub player_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Box<Player>>,
}

impl PlayerProfile {
    pub fn new(player_id: &str, notes: Option<&str>) -> Self {
        Self {
            player_id: player_id.to_string(),
            notes: notes.map(str::to_string),
            ..Self::default()
        }
    }
}

impl Resource for PlayerProfile {
    const ENTITY: &'static str = "player_profile";
    const ROUTE: &'static str = "player-profiles";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn schema() -> ValidationSchema {
        ValidationSchema::new(Self::ENTITY)
            .field("notes", FieldConstraint::string().nullable())
            .field("player_id", FieldConstraint::string().nullable().required())
    }

    fn relations() -> Vec<Relation> {
        vec![Relation::belongs_to("player", "player", "player_id")]
    }

    fn list_query() -> QueryDescriptor {
        QueryDescriptor::with_relations(["player"])
    }

    fn list_columns() -> Vec<ListColumn> {
        vec![ListColumn::new("player", "player", "/player/id")]
    }
}
