//! Mock REST API serving every registered entity from memory
//!
//! Implements the same contract the [`ResourceClient`](crate::client::ResourceClient)
//! speaks, for local development and integration tests:
//! - `GET /{route}` with `relation=`, filter and paging parameters
//! - `GET`, `PUT` and `DELETE /{route}/{id}`
//! - `POST /{route}`
//! - `GET /health`

pub mod handlers;

use crate::core::entity_registry::EntityRegistry;
use crate::core::validation::SchemaValidator;
use crate::entities::schema_validator;
use crate::storage::InMemoryStore;
use axum::{
    Json, Router,
    routing::get,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// State shared by the mock API handlers
#[derive(Clone)]
pub struct MockApiState {
    pub store: InMemoryStore,
    pub registry: Arc<EntityRegistry>,
    pub validator: Arc<SchemaValidator>,
    /// Bearer token every request must present, if any
    pub token: Option<String>,
}

impl MockApiState {
    pub fn new(store: InMemoryStore, registry: EntityRegistry, validator: SchemaValidator) -> Self {
        Self {
            store,
            registry: Arc::new(registry),
            validator: Arc::new(validator),
            token: None,
        }
    }

    /// Require `Authorization: Bearer {token}` on every entity route
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

impl Default for MockApiState {
    fn default() -> Self {
        Self::new(
            InMemoryStore::with_builtin_relations(),
            EntityRegistry::builtin().clone(),
            schema_validator(),
        )
    }
}

/// Build the mock API router
pub fn router(state: MockApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/{route}",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/{route}/{id}",
            get(handlers::get_record)
                .put(handlers::update_record)
                .delete(handlers::delete_record),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "this-admin-mock-api"
    }))
}

/// Serve the mock API on an already bound listener until Ctrl+C or SIGTERM
pub async fn serve(listener: TcpListener, state: MockApiState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Mock API listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Mock API shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
