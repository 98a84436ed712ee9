//! Create/edit form controller and foreign-key option loading

use super::{MountHandle, Navigation, PagePhase};
use crate::core::auth::{AccessContext, AccessOperation};
use crate::core::error::{AdminError, AdminResult, FieldValidationError, ValidationError};
use crate::core::field::FieldType;
use crate::core::query::QueryDescriptor;
use crate::core::resource::{Resource, ResourceService};
use crate::core::validation::ValidationSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Which record a form writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent
    Invalid,
    /// Record saved; the caller should route to the target
    Saved(Navigation),
    /// The server call failed; values are kept and the error is on the form
    Failed,
    /// The page was not ready, or was unmounted before the call resolved
    Ignored,
}

/// State of the create or edit form of resource `T`
pub struct FormPage<T: Resource> {
    service: Arc<dyn ResourceService<T>>,
    access: AccessContext,
    mode: FormMode,
    schema: ValidationSchema,
    values: Map<String, Value>,
    record: Option<T>,
    phase: PagePhase,
    field_errors: Vec<FieldValidationError>,
    form_error: Option<AdminError>,
    fetch_error: Option<AdminError>,
    mount: MountHandle,
}

impl<T: Resource> FormPage<T> {
    /// Create form with empty values; requires CREATE on `T`
    pub fn create(service: Arc<dyn ResourceService<T>>, access: AccessContext) -> AdminResult<Self> {
        access.require(T::ENTITY, AccessOperation::Create)?;
        let mut page = Self::build(service, access, FormMode::Create);
        page.phase = PagePhase::Ready;
        Ok(page)
    }

    /// Edit form for one record; requires UPDATE on `T`
    ///
    /// Values are filled by [`load`](Self::load).
    pub fn edit(
        service: Arc<dyn ResourceService<T>>,
        access: AccessContext,
        id: &str,
    ) -> AdminResult<Self> {
        access.require(T::ENTITY, AccessOperation::Update)?;
        Ok(Self::build(
            service,
            access,
            FormMode::Edit { id: id.to_string() },
        ))
    }

    fn build(service: Arc<dyn ResourceService<T>>, access: AccessContext, mode: FormMode) -> Self {
        let schema = T::schema();
        let values = empty_values(&schema);
        Self {
            service,
            access,
            mode,
            schema,
            values,
            record: None,
            phase: PagePhase::Idle,
            field_errors: Vec::new(),
            form_error: None,
            fetch_error: None,
            mount: MountHandle::new(),
        }
    }

    /// Fetch the edited record and reinitialize the values from it
    ///
    /// Create forms have nothing to fetch.
    pub async fn load(&mut self) {
        let FormMode::Edit { id } = &self.mode else {
            self.phase = PagePhase::Ready;
            return;
        };
        let id = id.clone();

        self.phase = PagePhase::Loading;
        self.fetch_error = None;

        let result = self.service.get(&id).await;
        if !self.mount.is_mounted() {
            tracing::debug!(entity = T::ENTITY, id = %id, "discarding fetch result after unmount");
            return;
        }

        let values = result.and_then(|record| {
            let serialized = serde_json::to_value(&record)?;
            Ok((record, serialized))
        });

        match values {
            Ok((record, serialized)) => {
                self.values = self.form_values(&serialized);
                self.record = Some(record);
                self.field_errors.clear();
                self.phase = PagePhase::Ready;
            }
            Err(e) => {
                tracing::warn!(entity = T::ENTITY, id = %id, error = %e, "failed to load record");
                self.fetch_error = Some(e);
                self.phase = PagePhase::Error;
            }
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    /// The fetched record, on edit forms
    pub fn record(&self) -> Option<&T> {
        self.record.as_ref()
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Set one input; clears that input's errors
    pub fn set_value(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value);
        self.field_errors.retain(|e| e.field != field);
    }

    /// First error to show next to an input
    pub fn field_error(&self, field: &str) -> Option<&FieldValidationError> {
        self.field_errors.iter().find(|e| e.field == field)
    }

    pub fn field_errors(&self) -> &[FieldValidationError] {
        &self.field_errors
    }

    /// Form-level error of the last submit
    pub fn form_error(&self) -> Option<&AdminError> {
        self.form_error.as_ref()
    }

    pub fn fetch_error(&self) -> Option<&AdminError> {
        self.fetch_error.as_ref()
    }

    pub fn mount_handle(&self) -> MountHandle {
        self.mount.clone()
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    /// Validate, then create or update
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.phase != PagePhase::Ready {
            return SubmitOutcome::Ignored;
        }

        let payload = Value::Object(self.form_values(&Value::Object(self.values.clone())));
        self.form_error = None;

        if let Err(e) = self.schema.validate(&payload) {
            tracing::debug!(entity = T::ENTITY, error = %e, "form rejected before submit");
            self.field_errors = match &e {
                ValidationError::FieldErrors(errors) => errors.clone(),
                _ => Vec::new(),
            };
            if self.field_errors.is_empty() {
                self.form_error = Some(e.into());
            }
            return SubmitOutcome::Invalid;
        }

        self.field_errors.clear();
        self.phase = PagePhase::Submitting;

        let result = match &self.mode {
            FormMode::Create => self.service.create(&payload).await,
            FormMode::Edit { id } => self.service.update(id, &payload).await,
        };
        if !self.mount.is_mounted() {
            tracing::debug!(entity = T::ENTITY, "discarding submit result after unmount");
            return SubmitOutcome::Ignored;
        }

        self.phase = PagePhase::Ready;
        match result {
            Ok(saved) => {
                tracing::debug!(entity = T::ENTITY, id = ?saved.id(), "record saved");
                self.values = empty_values(&self.schema);
                SubmitOutcome::Saved(Navigation::List {
                    route: T::ROUTE.to_string(),
                })
            }
            Err(e) => {
                tracing::warn!(entity = T::ENTITY, error = %e, "failed to save record");
                self.field_errors = e.field_errors().to_vec();
                self.form_error = Some(e);
                SubmitOutcome::Failed
            }
        }
    }

    /// Keep only the schema's fields, in declaration order
    fn form_values(&self, source: &Value) -> Map<String, Value> {
        self.schema
            .field_names()
            .map(|name| {
                let value = source.get(name).cloned().unwrap_or(Value::Null);
                (name.to_string(), value)
            })
            .collect()
    }

    pub fn access(&self) -> &AccessContext {
        &self.access
    }
}

/// Initial values: empty string for text inputs, null otherwise
fn empty_values(schema: &ValidationSchema) -> Map<String, Value> {
    schema
        .field_names()
        .map(|name| {
            let value = match schema.constraint(name) {
                Some(c) if !c.nullable && c.field_type == Some(FieldType::String) => {
                    Value::String(String::new())
                }
                _ => Value::Null,
            };
            (name.to_string(), value)
        })
        .collect()
}

/// One entry of a foreign-key select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Loads the choices of a foreign-key select from the related resource
pub struct OptionsLoader<R: Resource> {
    service: Arc<dyn ResourceService<R>>,
    access: AccessContext,
    query: QueryDescriptor,
}

impl<R: Resource> OptionsLoader<R> {
    pub fn new(service: Arc<dyn ResourceService<R>>, access: AccessContext) -> Self {
        Self {
            service,
            access,
            query: QueryDescriptor::new(),
        }
    }

    pub fn with_query(mut self, query: QueryDescriptor) -> Self {
        self.query = query;
        self
    }

    /// List the related records as options; records without an id are skipped
    pub async fn load<F>(&self, label: F) -> AdminResult<Vec<SelectOption>>
    where
        F: Fn(&R) -> String,
    {
        self.access.require(R::ENTITY, AccessOperation::Read)?;
        let records = self.service.list(&self.query).await?;
        Ok(records
            .iter()
            .filter_map(|record| {
                record.id().map(|id| SelectOption {
                    value: id.to_string(),
                    label: label(record),
                })
            })
            .collect())
    }
}
