//! Entity registry mapping URL route segments to backend entity names

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// One route → entity mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// User-facing route segment (e.g., "player-profiles")
    pub route_name: String,

    /// Backend entity name (e.g., "player_profile")
    pub entity_name: String,
}

impl EntityDescriptor {
    pub fn new(route_name: &str, entity_name: &str) -> Self {
        Self {
            route_name: route_name.to_string(),
            entity_name: entity_name.to_string(),
        }
    }
}

/// Mappings of the original admin application
pub fn default_descriptors() -> Vec<EntityDescriptor> {
    vec![
        EntityDescriptor::new("academies", "academy"),
        EntityDescriptor::new("players", "player"),
        EntityDescriptor::new("player-profiles", "player_profile"),
        EntityDescriptor::new("users", "user"),
    ]
}

/// Registry translating route segments into entity names
///
/// Route names are unique: registering a route twice keeps the latest
/// mapping. Lookups of unknown routes return the route itself.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    routes: HashMap<String, String>,
    entities: HashMap<String, String>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of descriptors
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = EntityDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry
    }

    /// Process-wide registry with the default mappings, built on first use
    pub fn builtin() -> &'static EntityRegistry {
        static BUILTIN: OnceLock<EntityRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| Self::from_descriptors(default_descriptors()))
    }

    /// Register a mapping, replacing any previous mapping of the same route
    pub fn register(&mut self, descriptor: EntityDescriptor) {
        if let Some(previous) = self
            .routes
            .insert(descriptor.route_name.clone(), descriptor.entity_name.clone())
        {
            if self.entities.get(&previous) == Some(&descriptor.route_name) {
                // Keep the entity reachable through any alias still bound to it
                let alias = self
                    .routes
                    .iter()
                    .filter(|(_, entity)| **entity == previous)
                    .map(|(route, _)| route)
                    .min()
                    .cloned();
                match alias {
                    Some(route) => self.entities.insert(previous, route),
                    None => self.entities.remove(&previous),
                };
            }
        }
        self.entities
            .insert(descriptor.entity_name, descriptor.route_name);
    }

    /// Resolve a route segment to its entity name
    ///
    /// Never fails: an unmapped route resolves to itself.
    pub fn resolve<'a>(&'a self, route: &'a str) -> &'a str {
        self.routes.get(route).map(String::as_str).unwrap_or(route)
    }

    /// Route segment serving an entity, if the entity is registered
    pub fn route_for(&self, entity_name: &str) -> Option<&str> {
        self.entities.get(entity_name).map(String::as_str)
    }

    /// Whether the entity name is served by some route
    pub fn contains_entity(&self, entity_name: &str) -> bool {
        self.entities.contains_key(entity_name)
    }

    /// All registered mappings, sorted by route name
    pub fn descriptors(&self) -> Vec<EntityDescriptor> {
        let mut descriptors: Vec<EntityDescriptor> = self
            .routes
            .iter()
            .map(|(route, entity)| EntityDescriptor::new(route, entity))
            .collect();
        descriptors.sort_by(|a, b| a.route_name.cmp(&b.route_name));
        descriptors
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_empty() {
        let registry = EntityRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.descriptors().is_empty());
    }

    #[test]
    fn test_builtin_mappings() {
        let registry = EntityRegistry::builtin();
        assert_eq!(registry.resolve("academies"), "academy");
        assert_eq!(registry.resolve("players"), "player");
        assert_eq!(registry.resolve("player-profiles"), "player_profile");
        assert_eq!(registry.resolve("users"), "user");
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_unmapped_route_resolves_to_itself() {
        let registry = EntityRegistry::builtin();
        for route in ["coaches", "", "player_profile", "PLAYERS", "players/1"] {
            assert_eq!(registry.resolve(route), route);
        }
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let registry = EntityRegistry::from_descriptors(default_descriptors());
        let first = registry.resolve("player-profiles").to_string();
        for _ in 0..10 {
            assert_eq!(registry.resolve("player-profiles"), first);
        }
    }

    #[test]
    fn test_route_for_reverse_lookup() {
        let registry = EntityRegistry::builtin();
        assert_eq!(registry.route_for("player_profile"), Some("player-profiles"));
        assert_eq!(registry.route_for("coach"), None);
        assert!(registry.contains_entity("academy"));
    }

    #[test]
    fn test_register_duplicate_route_replaces() {
        let mut registry = EntityRegistry::new();
        registry.register(EntityDescriptor::new("teams", "team"));
        registry.register(EntityDescriptor::new("teams", "squad"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("teams"), "squad");
        assert_eq!(registry.route_for("team"), None);
        assert_eq!(registry.route_for("squad"), Some("teams"));
    }

    #[test]
    fn test_rebinding_route_keeps_alias_reachable() {
        let mut registry = EntityRegistry::new();
        registry.register(EntityDescriptor::new("squads", "team"));
        registry.register(EntityDescriptor::new("teams", "team"));
        registry.register(EntityDescriptor::new("teams", "club"));

        assert_eq!(registry.resolve("squads"), "team");
        assert!(registry.contains_entity(registry.resolve("squads")));
        assert_eq!(registry.route_for("team"), Some("squads"));
        assert_eq!(registry.route_for("club"), Some("teams"));
    }

    #[test]
    fn test_descriptors_sorted_by_route() {
        let registry = EntityRegistry::from_descriptors(default_descriptors());
        let routes: Vec<String> = registry
            .descriptors()
            .into_iter()
            .map(|d| d.route_name)
            .collect();
        assert_eq!(
            routes,
            vec!["academies", "player-profiles", "players", "users"]
        );
    }
}
