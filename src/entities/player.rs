use super::{Counts, PlayerProfile, User};
use crate::core::query::QueryDescriptor;
use crate::core::resource::{ListColumn, Relation, Resource};
use crate::core::validation::{FieldConstraint, ValidationSchema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player, linked to its own user account, a coach and a parent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub user_id: String,

    #[serde(default)]
    pub coach_id: Option<String>,

    #[serde(default)]
    pub parent_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_profile: Option<Vec<PlayerProfile>>,

    #[serde(
        rename = "user_player_user_idTouser",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<User>,

    #[serde(
        rename = "user_player_coach_idTouser",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub coach: Option<User>,

    #[serde(
        rename = "user_player_parent_idTouser",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<User>,

    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<Counts>,
}

impl Player {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Self::default()
        }
    }

    /// Number of profiles, when requested with `player_profile.count`
    pub fn profile_count(&self) -> Option<u64> {
        self.counts
            .as_ref()
            .and_then(|c| c.get("player_profile"))
            .copied()
    }
}

impl Resource for Player {
    const ENTITY: &'static str = "player";
    const ROUTE: &'static str = "players";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn schema() -> ValidationSchema {
        ValidationSchema::new(Self::ENTITY)
            .field("user_id", FieldConstraint::string().nullable().required())
            .field("coach_id", FieldConstraint::string().nullable())
            .field("parent_id", FieldConstraint::string().nullable())
    }

    fn relations() -> Vec<Relation> {
        vec![
            Relation::belongs_to("user_player_user_idTouser", "user", "user_id"),
            Relation::belongs_to("user_player_coach_idTouser", "user", "coach_id"),
            Relation::belongs_to("user_player_parent_idTouser", "user", "parent_id"),
            Relation::has_many("player_profile", "player_profile", "player_id"),
        ]
    }

    fn list_query() -> QueryDescriptor {
        QueryDescriptor::with_relations([
            "user_player_user_idTouser",
            "user_player_coach_idTouser",
            "user_player_parent_idTouser",
            "player_profile.count",
        ])
    }

    fn list_columns() -> Vec<ListColumn> {
        vec![
            ListColumn::new("user_player_user_idTouser", "user", "/user_player_user_idTouser/email"),
            ListColumn::new("user_player_coach_idTouser", "user", "/user_player_coach_idTouser/email"),
            ListColumn::new(
                "user_player_parent_idTouser",
                "user",
                "/user_player_parent_idTouser/email",
            ),
            ListColumn::new("player_profile", "player_profile", "/_count/player_profile"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_expanded_record() {
        let player: Player = serde_json::from_value(json!({
            "id": "p1",
            "user_id": "u1",
            "coach_id": null,
            "created_at": "2024-03-01T10:00:00Z",
            "user_player_user_idTouser": {"id": "u1", "email": "kid@club.org"},
            "_count": {"player_profile": 2}
        }))
        .expect("player should deserialize");
        assert_eq!(player.id(), Some("p1"));
        assert_eq!(player.coach_id, None);
        assert_eq!(player.user.as_ref().map(|u| u.email.as_str()), Some("kid@club.org"));
        assert_eq!(player.profile_count(), Some(2));
    }

    #[test]
    fn test_new_player_serializes_only_form_fields() {
        let value = serde_json::to_value(Player::new("u1")).expect("serialize");
        assert_eq!(
            value,
            json!({"user_id": "u1", "coach_id": null, "parent_id": null})
        );
    }

    #[test]
    fn test_schema_requires_user_id() {
        let schema = Player::schema();
        assert!(schema.validate(&json!({"user_id": ""})).is_err());
        assert!(schema.validate(&json!({"user_id": "u1"})).is_ok());
    }
}
