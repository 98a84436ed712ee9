//! In-memory record store backing the mock API
//!
//! Records are schemaless JSON objects grouped in one table per entity.
//! Relations are resolved at read time from the declared [`Relation`]s.

use crate::core::error::{AdminError, AdminResult, ValidationError};
use crate::core::query::QueryDescriptor;
use crate::core::resource::{Relation, RelationKind};
use chrono::Utc;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// One stored record
pub type Record = Map<String, Value>;

type Tables = HashMap<String, IndexMap<String, Record>>;

/// Fields owned by the store; payloads cannot overwrite them
const MANAGED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Thread-safe in-memory store, one insertion-ordered table per entity
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    relations: Arc<HashMap<String, Vec<Relation>>>,
}

impl InMemoryStore {
    /// Create a store resolving the given relations (entity → relations)
    pub fn new(relations: HashMap<String, Vec<Relation>>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            relations: Arc::new(relations),
        }
    }

    /// Store knowing the relations of the built-in entities
    pub fn with_builtin_relations() -> Self {
        Self::new(crate::entities::relation_map())
    }

    fn read(&self) -> AdminResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| AdminError::Internal(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> AdminResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| AdminError::Internal(format!("Failed to acquire write lock: {}", e)))
    }

    /// Insert a record, assigning its id and timestamps
    pub fn insert(&self, entity: &str, payload: &Value) -> AdminResult<Value> {
        let mut record = as_object(payload)?;
        for field in MANAGED_FIELDS {
            record.remove(field);
        }

        let id = Uuid::new_v4().to_string();
        let now = Value::String(Utc::now().to_rfc3339());
        record.insert("id".to_string(), Value::String(id.clone()));
        record.insert("created_at".to_string(), now.clone());
        record.insert("updated_at".to_string(), now);

        let mut tables = self.write()?;
        tables
            .entry(entity.to_string())
            .or_default()
            .insert(id, record.clone());

        Ok(Value::Object(record))
    }

    /// Fetch one record, expanding the requested relations
    pub fn get(&self, entity: &str, id: &str, query: &QueryDescriptor) -> AdminResult<Value> {
        self.check_relations(entity, query)?;
        let tables = self.read()?;
        let record = tables
            .get(entity)
            .and_then(|table| table.get(id))
            .ok_or_else(|| not_found(entity, id))?;

        Ok(self.expand(&tables, entity, record, query))
    }

    /// List records matching the query's filters, sorted and paged
    pub fn list(&self, entity: &str, query: &QueryDescriptor) -> AdminResult<Vec<Value>> {
        self.check_relations(entity, query)?;
        let tables = self.read()?;
        let Some(table) = tables.get(entity) else {
            return Ok(Vec::new());
        };

        let mut records: Vec<&Record> = table
            .values()
            .filter(|record| {
                query
                    .filters
                    .iter()
                    .all(|(field, expected)| matches_filter(record.get(field), expected))
            })
            .collect();

        if let Some((field, descending)) = query.sort_spec() {
            records.sort_by(|a, b| {
                let ordering = compare_values(a.get(field), b.get(field));
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        Ok(records
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|record| self.expand(&tables, entity, record, query))
            .collect())
    }

    /// Merge the payload's fields into an existing record
    ///
    /// Fields absent from the payload are left unchanged.
    pub fn update(&self, entity: &str, id: &str, payload: &Value) -> AdminResult<Value> {
        let patch = as_object(payload)?;
        let mut tables = self.write()?;
        let record = tables
            .get_mut(entity)
            .and_then(|table| table.get_mut(id))
            .ok_or_else(|| not_found(entity, id))?;

        for (key, value) in patch {
            if !MANAGED_FIELDS.contains(&key.as_str()) {
                record.insert(key, value);
            }
        }
        record.insert(
            "updated_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        Ok(Value::Object(record.clone()))
    }

    /// Remove a record; `NotFound` when it does not exist
    pub fn delete(&self, entity: &str, id: &str) -> AdminResult<()> {
        let mut tables = self.write()?;
        tables
            .get_mut(entity)
            .and_then(|table| table.shift_remove(id))
            .map(|_| ())
            .ok_or_else(|| not_found(entity, id))
    }

    /// Number of records of an entity
    pub fn count(&self, entity: &str) -> AdminResult<usize> {
        Ok(self.read()?.get(entity).map_or(0, IndexMap::len))
    }

    fn relation(&self, entity: &str, name: &str) -> Option<&Relation> {
        self.relations
            .get(entity)
            .and_then(|rels| rels.iter().find(|r| r.name == name))
    }

    fn check_relations(&self, entity: &str, query: &QueryDescriptor) -> AdminResult<()> {
        let unknown = query
            .expanded_relations()
            .chain(query.count_relations())
            .find(|name| self.relation(entity, name).is_none());

        match unknown {
            Some(name) => Err(ValidationError::Rejected {
                message: format!("unknown relation '{}' for entity '{}'", name, entity),
            }
            .into()),
            None => Ok(()),
        }
    }

    fn expand(&self, tables: &Tables, entity: &str, record: &Record, query: &QueryDescriptor) -> Value {
        let mut out = record.clone();

        for name in query.expanded_relations() {
            if let Some(relation) = self.relation(entity, name) {
                let value = match relation.kind {
                    RelationKind::BelongsTo => related_one(tables, relation, record)
                        .map_or(Value::Null, |r| Value::Object(r.clone())),
                    RelationKind::HasMany => Value::Array(
                        related_many(tables, relation, record)
                            .map(|r| Value::Object(r.clone()))
                            .collect(),
                    ),
                };
                out.insert(name.to_string(), value);
            }
        }

        let mut counts = Map::new();
        for name in query.count_relations() {
            if let Some(relation) = self.relation(entity, name) {
                let n = match relation.kind {
                    RelationKind::BelongsTo => usize::from(related_one(tables, relation, record).is_some()),
                    RelationKind::HasMany => related_many(tables, relation, record).count(),
                };
                counts.insert(name.to_string(), Value::from(n));
            }
        }
        if !counts.is_empty() {
            out.insert("_count".to_string(), Value::Object(counts));
        }

        Value::Object(out)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::with_builtin_relations()
    }
}

fn as_object(payload: &Value) -> AdminResult<Record> {
    payload.as_object().cloned().ok_or_else(|| {
        ValidationError::InvalidPayload {
            message: "expected a JSON object".to_string(),
        }
        .into()
    })
}

fn not_found(entity: &str, id: &str) -> AdminError {
    AdminError::NotFound {
        entity_type: entity.to_string(),
        id: id.to_string(),
    }
}

fn related_one<'a>(tables: &'a Tables, relation: &Relation, record: &Record) -> Option<&'a Record> {
    let key = record.get(relation.foreign_key)?.as_str()?;
    tables.get(relation.target)?.get(key)
}

fn related_many<'a>(
    tables: &'a Tables,
    relation: &'a Relation,
    record: &'a Record,
) -> impl Iterator<Item = &'a Record> + 'a {
    let id = record.get("id").and_then(Value::as_str);
    tables
        .get(relation.target)
        .into_iter()
        .flat_map(IndexMap::values)
        .filter(move |candidate| {
            id.is_some() && candidate.get(relation.foreign_key).and_then(Value::as_str) == id
        })
}

/// Query-string filters compare against the value's textual form
fn matches_filter(value: Option<&Value>, expected: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == expected,
        Some(Value::Null) | None => expected == "null",
        Some(other) => other.to_string() == expected,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
