//! Page controllers for list, create and edit screens
//!
//! Controllers hold page state only; rendering is up to the caller. Every
//! page is authorized on construction, and every affordance it exposes is
//! computed through the [`AccessContext`].
//!
//! ```text
//! Idle ──load──▶ Loading ──ok──▶ Ready ──submit──▶ Submitting ──▶ Ready
//!                        └─err─▶ Error
//! ```

pub mod form;
pub mod list;

pub use form::{FormMode, FormPage, OptionsLoader, SelectOption, SubmitOutcome};
pub use list::{ListAffordances, ListPage};

use crate::core::auth::{AccessContext, AccessGuard, AccessOperation, AccessService, Subject};
use crate::core::error::AdminResult;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Lifecycle phase of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagePhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Submitting,
    Error,
}

/// Where the caller should route next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    List { route: String },
    Create { route: String },
    View { route: String, id: String },
    Edit { route: String, id: String },
}

impl Navigation {
    /// URL path of the target page
    pub fn path(&self) -> String {
        match self {
            Navigation::List { route } => format!("/{}", route),
            Navigation::Create { route } => format!("/{}/create", route),
            Navigation::View { route, id } => format!("/{}/view/{}", route, id),
            Navigation::Edit { route, id } => format!("/{}/edit/{}", route, id),
        }
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Mounted flag shared between a page and whoever tears it down
///
/// Results arriving after [`unmount`](Self::unmount) are discarded.
#[derive(Debug, Clone)]
pub struct MountHandle(Arc<AtomicBool>);

impl MountHandle {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for MountHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Page-level authorization
///
/// Builds the page's access context, or fails with `AccessDenied` so the
/// caller can redirect instead of rendering a degraded page.
pub fn authorize_page(
    guard: Arc<dyn AccessGuard>,
    subject: Subject,
    service: AccessService,
    entity: &str,
    operation: AccessOperation,
) -> AdminResult<AccessContext> {
    let access = AccessContext::new(guard, subject, service);
    access.require(entity, operation)?;
    Ok(access)
}
