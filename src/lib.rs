//! # this-admin
//!
//! A generic admin-CRUD core: per-entity list and form pages over a REST API,
//! with client-side validation and capability checks on every action.
//!
//! ## Features
//!
//! - **Entity Registry**: route segments resolved to backend entity names
//! - **Schema Validation**: declarative per-field constraints checked before submit
//! - **Typed Resource Client**: list/get/create/update/delete with relation expansion
//! - **Access Guard**: every page and affordance gated by (entity, operation, service, subject)
//! - **Page Controllers**: list, create and edit state machines with cancellation
//! - **Mock API**: in-memory axum server speaking the same REST contract
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use this_admin::prelude::*;
//!
//! let api = ApiClient::new("http://localhost:3000");
//! let players: Arc<dyn ResourceService<Player>> = Arc::new(api.resource::<Player>());
//!
//! let access = authorize_page(
//!     Arc::new(AllowAll),
//!     Subject::user("u1", ["coach"]),
//!     AccessService::Project,
//!     Player::ENTITY,
//!     AccessOperation::Read,
//! )?;
//!
//! let mut page = ListPage::open(players, access)?;
//! page.load().await;
//! for player in page.rows() {
//!     println!("{:?} {:?}", player.id, player.profile_count());
//! }
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod entities;
pub mod pages;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::client::{ApiClient, ResourceClient};
    pub use crate::config::{AdminConfig, ApiConfig, EntityAuthConfig};
    pub use crate::core::{
        AccessContext, AccessGuard, AccessOperation, AccessService, AdminError, AdminResult,
        AllowAll, AuthPolicy, DenyAll, EntityDescriptor, EntityRegistry, FieldConstraint,
        FieldErrorKind, FieldFormat, FieldType, FieldValidationError, ListColumn, PolicyGuard,
        QueryDescriptor, Relation, RelationKind, Resource, ResourceService, SchemaValidator,
        Subject, ValidationError, ValidationSchema,
    };
    pub use crate::entities::{Academy, Player, PlayerProfile, User};
    pub use crate::pages::{
        FormMode, FormPage, ListAffordances, ListPage, MountHandle, Navigation, OptionsLoader,
        PagePhase, SelectOption, SubmitOutcome, authorize_page,
    };
    pub use crate::server::MockApiState;
    pub use crate::storage::InMemoryStore;

    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
