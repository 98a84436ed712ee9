//! List page controller

use super::{MountHandle, Navigation, PagePhase};
use crate::core::auth::{AccessContext, AccessOperation};
use crate::core::error::{AdminError, AdminResult};
use crate::core::query::QueryDescriptor;
use crate::core::resource::{ListColumn, Resource, ResourceService};
use serde_json::Value;
use std::sync::Arc;

/// Actions the viewer may take on a list page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListAffordances {
    pub create: bool,
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
}

/// State of the list page of resource `T`
pub struct ListPage<T: Resource> {
    service: Arc<dyn ResourceService<T>>,
    access: AccessContext,
    query: QueryDescriptor,
    phase: PagePhase,
    rows: Vec<T>,
    fetch_error: Option<AdminError>,
    delete_error: Option<AdminError>,
    mount: MountHandle,
}

impl<T: Resource> ListPage<T> {
    /// Open the page; fails with `AccessDenied` without READ on `T`
    pub fn open(service: Arc<dyn ResourceService<T>>, access: AccessContext) -> AdminResult<Self> {
        access.require(T::ENTITY, AccessOperation::Read)?;
        Ok(Self {
            service,
            access,
            query: T::list_query(),
            phase: PagePhase::Idle,
            rows: Vec::new(),
            fetch_error: None,
            delete_error: None,
            mount: MountHandle::new(),
        })
    }

    /// Replace the default list query (relations, filters, paging)
    pub fn with_query(mut self, query: QueryDescriptor) -> Self {
        self.query = query;
        self
    }

    /// Fetch the rows; runs on mount and after every mutation
    pub async fn load(&mut self) {
        self.phase = PagePhase::Loading;
        self.fetch_error = None;

        let result = self.service.list(&self.query).await;
        if !self.mount.is_mounted() {
            tracing::debug!(entity = T::ENTITY, "discarding list result after unmount");
            return;
        }

        match result {
            Ok(rows) => {
                self.rows = rows;
                self.phase = PagePhase::Ready;
            }
            Err(e) => {
                tracing::warn!(entity = T::ENTITY, error = %e, "failed to load list");
                self.fetch_error = Some(e);
                self.phase = PagePhase::Error;
            }
        }
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn query(&self) -> &QueryDescriptor {
        &self.query
    }

    /// Failure of the last fetch
    pub fn fetch_error(&self) -> Option<&AdminError> {
        self.fetch_error.as_ref()
    }

    /// Failure of the last delete
    pub fn delete_error(&self) -> Option<&AdminError> {
        self.delete_error.as_ref()
    }

    /// Handle for tearing the page down from elsewhere
    pub fn mount_handle(&self) -> MountHandle {
        self.mount.clone()
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    pub fn affordances(&self) -> ListAffordances {
        ListAffordances {
            create: self.access.can(T::ENTITY, AccessOperation::Create),
            view: self.access.can(T::ENTITY, AccessOperation::Read),
            edit: self.access.can(T::ENTITY, AccessOperation::Update),
            delete: self.access.can(T::ENTITY, AccessOperation::Delete),
        }
    }

    /// Related-entity columns the viewer can read
    pub fn visible_columns(&self) -> Vec<ListColumn> {
        T::list_columns()
            .into_iter()
            .filter(|column| self.access.can(column.entity, AccessOperation::Read))
            .collect()
    }

    /// Cell values of one row, aligned with [`visible_columns`](Self::visible_columns)
    pub fn cells(&self, row: &T) -> AdminResult<Vec<Option<Value>>> {
        let record = serde_json::to_value(row)?;
        Ok(self
            .visible_columns()
            .iter()
            .map(|column| column.value(&record).cloned())
            .collect())
    }

    pub fn create(&self) -> Option<Navigation> {
        self.access
            .can(T::ENTITY, AccessOperation::Create)
            .then(|| Navigation::Create {
                route: T::ROUTE.to_string(),
            })
    }

    /// Row click target
    pub fn view(&self, id: &str) -> Option<Navigation> {
        self.access
            .can(T::ENTITY, AccessOperation::Read)
            .then(|| Navigation::View {
                route: T::ROUTE.to_string(),
                id: id.to_string(),
            })
    }

    pub fn edit(&self, id: &str) -> Option<Navigation> {
        self.access
            .can(T::ENTITY, AccessOperation::Update)
            .then(|| Navigation::Edit {
                route: T::ROUTE.to_string(),
                id: id.to_string(),
            })
    }

    /// Delete a row, then refetch
    ///
    /// A record that is already gone counts as deleted. Any other failure is
    /// kept in [`delete_error`](Self::delete_error) and the rows stay as they are.
    pub async fn delete(&mut self, id: &str) {
        if !self.access.can(T::ENTITY, AccessOperation::Delete) {
            tracing::warn!(entity = T::ENTITY, id, "delete not permitted, ignoring");
            return;
        }

        self.delete_error = None;
        let result = self.service.delete(id).await;
        if !self.mount.is_mounted() {
            tracing::debug!(entity = T::ENTITY, id, "discarding delete result after unmount");
            return;
        }

        match result {
            Ok(()) => self.load().await,
            Err(e) if e.is_not_found() => {
                tracing::debug!(entity = T::ENTITY, id, "record already deleted");
                self.load().await;
            }
            Err(e) => {
                tracing::warn!(entity = T::ENTITY, id, error = %e, "failed to delete record");
                self.delete_error = Some(e);
            }
        }
    }
}
