//! HTTP handlers of the mock API
//!
//! Handlers are entity-agnostic: the route segment is resolved through the
//! registry and every entity shares the same store and validator.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::Value;

use super::MockApiState;
use crate::core::auth::AccessOperation;
use crate::core::error::{AdminError, AdminResult};
use crate::core::query::QueryDescriptor;

type QueryPairs = Query<Vec<(String, String)>>;

impl MockApiState {
    /// Entity served under a route segment
    fn entity_for(&self, route: &str) -> AdminResult<String> {
        let entity = self.registry.resolve(route);
        if self.registry.contains_entity(entity) {
            Ok(entity.to_string())
        } else {
            Err(AdminError::UnknownEntity {
                entity_type: entity.to_string(),
            })
        }
    }

    /// Bearer token check, when the API is configured with a token
    fn authorize(
        &self,
        headers: &HeaderMap,
        entity: &str,
        operation: AccessOperation,
    ) -> AdminResult<()> {
        let Some(expected) = self.token.as_deref() else {
            return Ok(());
        };

        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        if presented == Some(expected) {
            Ok(())
        } else {
            Err(AdminError::AccessDenied {
                entity_type: entity.to_string(),
                operation,
                reason: "missing or invalid session token".to_string(),
            })
        }
    }
}

/// `GET /{route}`
pub async fn list_records(
    State(state): State<MockApiState>,
    Path(route): Path<String>,
    headers: HeaderMap,
    Query(pairs): QueryPairs,
) -> Result<Json<Vec<Value>>, AdminError> {
    let entity = state.entity_for(&route)?;
    state.authorize(&headers, &entity, AccessOperation::Read)?;

    let query = QueryDescriptor::from_query_pairs(pairs);
    let records = state.store.list(&entity, &query)?;
    tracing::debug!(entity = %entity, count = records.len(), "listed records");
    Ok(Json(records))
}

/// `GET /{route}/{id}`
pub async fn get_record(
    State(state): State<MockApiState>,
    Path((route, id)): Path<(String, String)>,
    headers: HeaderMap,
    Query(pairs): QueryPairs,
) -> Result<Json<Value>, AdminError> {
    let entity = state.entity_for(&route)?;
    state.authorize(&headers, &entity, AccessOperation::Read)?;

    let query = QueryDescriptor::from_query_pairs(pairs);
    Ok(Json(state.store.get(&entity, &id, &query)?))
}

/// `POST /{route}`
pub async fn create_record(
    State(state): State<MockApiState>,
    Path(route): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, AdminError> {
    let entity = state.entity_for(&route)?;
    state.authorize(&headers, &entity, AccessOperation::Create)?;

    state.validator.validate(&entity, &payload)?;
    let record = state.store.insert(&entity, &payload)?;
    tracing::debug!(entity = %entity, id = ?record.get("id"), "created record");
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /{route}/{id}`, merging the payload into the stored record
pub async fn update_record(
    State(state): State<MockApiState>,
    Path((route, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AdminError> {
    let entity = state.entity_for(&route)?;
    state.authorize(&headers, &entity, AccessOperation::Update)?;

    state.store.get(&entity, &id, &QueryDescriptor::default())?;
    state.validator.validate_partial(&entity, &payload)?;
    Ok(Json(state.store.update(&entity, &id, &payload)?))
}

/// `DELETE /{route}/{id}`
pub async fn delete_record(
    State(state): State<MockApiState>,
    Path((route, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, AdminError> {
    let entity = state.entity_for(&route)?;
    state.authorize(&headers, &entity, AccessOperation::Delete)?;

    state.store.delete(&entity, &id)?;
    tracing::debug!(entity = %entity, id = %id, "deleted record");
    Ok(StatusCode::NO_CONTENT)
}
