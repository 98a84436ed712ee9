//! Resource definitions for the academy domain
//!
//! Each record type implements [`Resource`] and carries its own schema,
//! relations and list columns.

pub mod academy;
pub mod player;
pub mod player_profile;
pub mod user;

pub use academy::Academy;
pub use player::Player;
pub use player_profile::PlayerProfile;
pub use user::User;

use crate::core::resource::{Relation, Resource};
use crate::core::validation::SchemaValidator;
use std::collections::{BTreeMap, HashMap};

/// Aggregate counts returned under `_count` (relation → number of records)
pub type Counts = BTreeMap<String, u64>;

/// Validator holding the schema of every built-in resource
pub fn schema_validator() -> SchemaValidator {
    SchemaValidator::new()
        .with_schema(Academy::schema())
        .with_schema(Player::schema())
        .with_schema(PlayerProfile::schema())
        .with_schema(User::schema())
}

/// Relations of every built-in resource, keyed by entity name
pub fn relation_map() -> HashMap<String, Vec<Relation>> {
    fn entry<T: Resource>() -> (String, Vec<Relation>) {
        (T::ENTITY.to_string(), T::relations())
    }

    HashMap::from([
        entry::<Academy>(),
        entry::<Player>(),
        entry::<PlayerProfile>(),
        entry::<User>(),
    ])
}
