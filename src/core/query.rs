//! Query descriptors: relation expansion, filters and paging

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix turning a relation path into an aggregate count request
pub const COUNT_SUFFIX: &str = ".count";

const RELATION_PARAM: &str = "relation";
const LIMIT_PARAM: &str = "limit";
const OFFSET_PARAM: &str = "offset";
const ORDER_PARAM: &str = "order";

/// What a list request asks the server for
///
/// # Wire format
/// ```text
/// GET /players?relation=user_player_user_idTouser&relation=player_profile.count
/// GET /player-profiles?player_id=abc&limit=20&offset=40&order=created_at:desc
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Relation paths to expand, in request order
    #[serde(default)]
    pub relations: Vec<String>,

    /// Exact-match filters (field → value)
    #[serde(default)]
    pub filters: BTreeMap<String, String>,

    /// Maximum number of records
    #[serde(default)]
    pub limit: Option<usize>,

    /// Number of records to skip
    #[serde(default)]
    pub offset: Option<usize>,

    /// Sort expression, `field` or `field:asc` or `field:desc`
    #[serde(default)]
    pub order: Option<String>,
}

impl QueryDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relations<I, S>(relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            relations: relations.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn relation(mut self, path: impl Into<String>) -> Self {
        self.relations.push(path.into());
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Relations requested as aggregate counts, without the suffix
    pub fn count_relations(&self) -> impl Iterator<Item = &str> {
        self.relations
            .iter()
            .filter_map(|r| r.strip_suffix(COUNT_SUFFIX))
    }

    /// Relations requested as expanded records
    pub fn expanded_relations(&self) -> impl Iterator<Item = &str> {
        self.relations
            .iter()
            .filter(|r| !r.ends_with(COUNT_SUFFIX))
            .map(String::as_str)
    }

    /// Parsed sort expression: (field, descending)
    pub fn sort_spec(&self) -> Option<(&str, bool)> {
        let order = self.order.as_deref()?;
        match order.split_once(':') {
            Some((field, dir)) => Some((field, dir.eq_ignore_ascii_case("desc"))),
            None => Some((order, false)),
        }
    }

    /// Query string pairs, relations first, in a stable order
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .relations
            .iter()
            .map(|r| (RELATION_PARAM.to_string(), r.clone()))
            .collect();
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(limit) = self.limit {
            pairs.push((LIMIT_PARAM.to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push((OFFSET_PARAM.to_string(), offset.to_string()));
        }
        if let Some(order) = &self.order {
            pairs.push((ORDER_PARAM.to_string(), order.clone()));
        }
        pairs
    }

    /// Rebuild a descriptor from query string pairs
    ///
    /// Unparseable paging values are ignored; every unreserved key is a filter.
    pub fn from_query_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::new();
        for (key, value) in pairs {
            match key.as_str() {
                RELATION_PARAM => query.relations.push(value),
                LIMIT_PARAM => query.limit = value.parse().ok(),
                OFFSET_PARAM => query.offset = value.parse().ok(),
                ORDER_PARAM => query.order = Some(value),
                _ => {
                    query.filters.insert(key, value);
                }
            }
        }
        query
    }
}
