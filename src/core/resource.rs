//! Resource abstraction shared by every entity
//!
//! An entity is configured, not subclassed: its record type implements
//! [`Resource`] to name its backend entity and route, declare its validation
//! schema, and list the relations and columns its list page uses.

use crate::core::error::AdminResult;
use crate::core::query::QueryDescriptor;
use crate::core::validation::ValidationSchema;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// How a relation is resolved on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// `record[foreign_key]` holds the id of one target record
    BelongsTo,
    /// Target records hold this record's id in `target[foreign_key]`
    HasMany,
}

/// A relation path a list request can expand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Name used in `relation=` parameters and as the response key
    pub name: &'static str,
    /// Target entity name
    pub target: &'static str,
    pub foreign_key: &'static str,
    pub kind: RelationKind,
}

impl Relation {
    pub const fn belongs_to(
        name: &'static str,
        target: &'static str,
        foreign_key: &'static str,
    ) -> Self {
        Self {
            name,
            target,
            foreign_key,
            kind: RelationKind::BelongsTo,
        }
    }

    pub const fn has_many(
        name: &'static str,
        target: &'static str,
        foreign_key: &'static str,
    ) -> Self {
        Self {
            name,
            target,
            foreign_key,
            kind: RelationKind::HasMany,
        }
    }
}

/// A list page column backed by another entity
///
/// The column renders only when the viewer can read `entity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListColumn {
    pub label: &'static str,
    /// Entity whose READ permission gates the column
    pub entity: &'static str,
    /// JSON pointer into the serialized record (e.g. `/_count/player_profile`)
    pub pointer: &'static str,
}

impl ListColumn {
    pub const fn new(label: &'static str, entity: &'static str, pointer: &'static str) -> Self {
        Self {
            label,
            entity,
            pointer,
        }
    }

    /// Cell value for a serialized record
    pub fn value<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        record.pointer(self.pointer).filter(|v| !v.is_null())
    }
}

/// A record type served by one REST collection
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Backend entity name (e.g., "player_profile")
    const ENTITY: &'static str;

    /// Route segment of the collection (e.g., "player-profiles")
    const ROUTE: &'static str;

    /// Server-assigned identifier, absent before creation
    fn id(&self) -> Option<&str>;

    /// Client-side validation schema
    fn schema() -> ValidationSchema;

    /// Relations the server can expand for this entity
    fn relations() -> Vec<Relation> {
        Vec::new()
    }

    /// Relations requested by the list page
    fn list_query() -> QueryDescriptor {
        QueryDescriptor::new()
    }

    /// Related-entity columns of the list page
    fn list_columns() -> Vec<ListColumn> {
        Vec::new()
    }
}

/// CRUD operations over one resource type
///
/// All calls are single-shot: failures propagate, nothing is retried.
#[async_trait]
pub trait ResourceService<T: Resource>: Send + Sync {
    /// List records, expanding relations and applying filters server-side
    async fn list(&self, query: &QueryDescriptor) -> AdminResult<Vec<T>>;

    /// Get one record; `NotFound` when the id does not exist
    async fn get(&self, id: &str) -> AdminResult<T>;

    /// Create a record from a payload
    async fn create(&self, payload: &Value) -> AdminResult<T>;

    /// Partially update a record; absent fields are left unchanged
    async fn update(&self, id: &str, payload: &Value) -> AdminResult<T>;

    /// Delete a record; `NotFound` when it is already gone
    async fn delete(&self, id: &str) -> AdminResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_value_follows_pointer() {
        let column = ListColumn::new("player_profile", "player_profile", "/_count/player_profile");
        let record = json!({"id": "p1", "_count": {"player_profile": 3}});
        assert_eq!(column.value(&record), Some(&json!(3)));
    }

    #[test]
    fn test_column_value_null_is_empty() {
        let column = ListColumn::new("coach", "user", "/user_player_coach_idTouser/email");
        assert_eq!(column.value(&json!({"user_player_coach_idTouser": null})), None);
        assert_eq!(column.value(&json!({})), None);
    }

    #[test]
    fn test_relation_constructors() {
        let rel = Relation::has_many("player_profile", "player_profile", "player_id");
        assert_eq!(rel.kind, RelationKind::HasMany);
        let rel = Relation::belongs_to("player", "player", "player_id");
        assert_eq!(rel.kind, RelationKind::BelongsTo);
    }
}
