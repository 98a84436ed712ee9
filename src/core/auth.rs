//! Authorization for this-admin
//!
//! Every page action is a capability check over
//! (entity, operation, service, subject):
//! - [`AccessGuard`] is the decision interface, injected into controllers
//! - [`PolicyGuard`] answers from per-entity policies loaded from config
//! - [`AccessContext`] bundles a guard with the session subject
//! - [`AccessContext::require`] is the page-level decorator

use crate::core::error::{AdminError, AdminResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// CRUD operation being authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessOperation {
    Create,
    Read,
    Update,
    Delete,
}

impl AccessOperation {
    pub const ALL: [AccessOperation; 4] = [
        AccessOperation::Create,
        AccessOperation::Read,
        AccessOperation::Update,
        AccessOperation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessOperation::Create => "create",
            AccessOperation::Read => "read",
            AccessOperation::Update => "update",
            AccessOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for AccessOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission scope the check is evaluated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessService {
    /// Tenant data managed through the admin pages
    #[default]
    Project,
    /// Platform-level administration
    Platform,
}

/// Who is acting, as supplied by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// Signed-in user
    User {
        user_id: String,
        tenant_id: Option<String>,
        roles: Vec<String>,
    },

    /// Platform administrator
    Admin { admin_id: String },

    /// No session
    Anonymous,
}

impl Subject {
    /// Convenience constructor for a user with roles
    pub fn user<I, S>(user_id: &str, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Subject::User {
            user_id: user_id.to_string(),
            tenant_id: None,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Subject::User { user_id, .. } => Some(user_id),
            _ => None,
        }
    }

    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            Subject::User { tenant_id, .. } => tenant_id.as_deref(),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Subject::Admin { .. })
    }

    pub fn has_role(&self, role: &str) -> bool {
        match self {
            Subject::User { roles, .. } => roles.iter().any(|r| r == role),
            _ => false,
        }
    }
}

/// Authorization policy for one (entity, operation)
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Anyone, including anonymous sessions
    Public,

    /// Any signed-in subject
    Authenticated,

    /// User must have one of these roles (admins always pass)
    HasRole(Vec<String>),

    /// Admin only
    AdminOnly,

    /// Nobody
    Deny,

    /// Combination of policies (AND)
    And(Vec<AuthPolicy>),

    /// Combination of policies (OR)
    Or(Vec<AuthPolicy>),

    /// Custom policy function
    Custom(fn(&Subject) -> bool),
}

impl AuthPolicy {
    /// Check if the subject satisfies this policy
    pub fn check(&self, subject: &Subject) -> bool {
        match self {
            AuthPolicy::Public => true,

            AuthPolicy::Authenticated => !matches!(subject, Subject::Anonymous),

            AuthPolicy::HasRole(required_roles) => {
                subject.is_admin() || required_roles.iter().any(|r| subject.has_role(r))
            }

            AuthPolicy::AdminOnly => subject.is_admin(),

            AuthPolicy::Deny => false,

            AuthPolicy::And(policies) => policies.iter().all(|p| p.check(subject)),

            AuthPolicy::Or(policies) => policies.iter().any(|p| p.check(subject)),

            AuthPolicy::Custom(f) => f(subject),
        }
    }

    /// Parse a policy from its config form
    ///
    /// Accepted: `public`, `authenticated`, `admin_only`, `deny`,
    /// `role:<name>` and `any_role:<a>,<b>`. Anything else is rejected so a
    /// typo never widens access.
    pub fn parse_policy(s: &str) -> Option<Self> {
        match s.trim() {
            "public" => Some(AuthPolicy::Public),
            "authenticated" => Some(AuthPolicy::Authenticated),
            "admin_only" => Some(AuthPolicy::AdminOnly),
            "deny" => Some(AuthPolicy::Deny),
            s => {
                if let Some(role) = s.strip_prefix("role:") {
                    non_empty_roles([role])
                } else if let Some(roles) = s.strip_prefix("any_role:") {
                    non_empty_roles(roles.split(','))
                } else {
                    None
                }
            }
        }
    }
}

fn non_empty_roles<'a>(roles: impl IntoIterator<Item = &'a str>) -> Option<AuthPolicy> {
    let roles: Vec<String> = roles
        .into_iter()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();
    if roles.is_empty() {
        None
    } else {
        Some(AuthPolicy::HasRole(roles))
    }
}

/// Capability check interface
///
/// Synchronous and pure with respect to the subject passed in.
pub trait AccessGuard: Send + Sync {
    fn has_access(
        &self,
        entity: &str,
        operation: AccessOperation,
        service: AccessService,
        subject: &Subject,
    ) -> bool;
}

/// Guard granting everything (development)
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessGuard for AllowAll {
    fn has_access(&self, _: &str, _: AccessOperation, _: AccessService, _: &Subject) -> bool {
        true
    }
}

/// Guard refusing everything
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl AccessGuard for DenyAll {
    fn has_access(&self, _: &str, _: AccessOperation, _: AccessService, _: &Subject) -> bool {
        false
    }
}

/// Guard backed by per-entity, per-operation policies
///
/// Anything without a policy is denied.
#[derive(Debug, Clone, Default)]
pub struct PolicyGuard {
    policies: HashMap<(AccessService, String, AccessOperation), AuthPolicy>,
}

impl PolicyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for one operation
    pub fn allow(
        mut self,
        service: AccessService,
        entity: &str,
        operation: AccessOperation,
        policy: AuthPolicy,
    ) -> Self {
        self.set_policy(service, entity, operation, policy);
        self
    }

    /// Set the same policy for every operation on an entity
    pub fn allow_all_operations(
        mut self,
        service: AccessService,
        entity: &str,
        policy: AuthPolicy,
    ) -> Self {
        for operation in AccessOperation::ALL {
            self.set_policy(service, entity, operation, policy.clone());
        }
        self
    }

    pub fn set_policy(
        &mut self,
        service: AccessService,
        entity: &str,
        operation: AccessOperation,
        policy: AuthPolicy,
    ) {
        self.policies
            .insert((service, entity.to_string(), operation), policy);
    }

    pub fn policy(
        &self,
        service: AccessService,
        entity: &str,
        operation: AccessOperation,
    ) -> Option<&AuthPolicy> {
        self.policies.get(&(service, entity.to_string(), operation))
    }
}

impl AccessGuard for PolicyGuard {
    fn has_access(
        &self,
        entity: &str,
        operation: AccessOperation,
        service: AccessService,
        subject: &Subject,
    ) -> bool {
        self.policy(service, entity, operation)
            .is_some_and(|policy| policy.check(subject))
    }
}

/// A guard, the session subject and the service scope of one page
#[derive(Clone)]
pub struct AccessContext {
    guard: Arc<dyn AccessGuard>,
    subject: Subject,
    service: AccessService,
}

impl AccessContext {
    pub fn new(guard: Arc<dyn AccessGuard>, subject: Subject, service: AccessService) -> Self {
        Self {
            guard,
            subject,
            service,
        }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn service(&self) -> AccessService {
        self.service
    }

    /// Whether the subject may perform the operation on the entity
    pub fn can(&self, entity: &str, operation: AccessOperation) -> bool {
        self.guard
            .has_access(entity, operation, self.service, &self.subject)
    }

    /// Page-level check: fails with `AccessDenied` instead of rendering
    pub fn require(&self, entity: &str, operation: AccessOperation) -> AdminResult<()> {
        if self.can(entity, operation) {
            Ok(())
        } else {
            tracing::warn!(
                entity,
                operation = %operation,
                user_id = self.subject.user_id().unwrap_or("anonymous"),
                "access denied"
            );
            Err(AdminError::AccessDenied {
                entity_type: entity.to_string(),
                operation,
                reason: format!("missing {} permission on {}", operation, entity),
            })
        }
    }
}

impl fmt::Debug for AccessContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessContext")
            .field("subject", &self.subject)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coach() -> Subject {
        Subject::user("u-coach", ["coach"])
    }

    #[test]
    fn test_policy_check() {
        let user = coach();
        assert!(AuthPolicy::Authenticated.check(&user));
        assert!(AuthPolicy::HasRole(vec!["coach".into()]).check(&user));
        assert!(!AuthPolicy::AdminOnly.check(&user));

        let anon = Subject::Anonymous;
        assert!(AuthPolicy::Public.check(&anon));
        assert!(!AuthPolicy::Authenticated.check(&anon));
        assert!(!AuthPolicy::Deny.check(&anon));
    }

    #[test]
    fn test_admin_passes_role_checks() {
        let admin = Subject::Admin {
            admin_id: "a1".to_string(),
        };
        assert!(AuthPolicy::HasRole(vec!["coach".into()]).check(&admin));
        assert!(AuthPolicy::AdminOnly.check(&admin));
    }

    #[test]
    fn test_policy_check_combinators() {
        let user = coach();
        let and = AuthPolicy::And(vec![
            AuthPolicy::Authenticated,
            AuthPolicy::HasRole(vec!["parent".into()]),
        ]);
        assert!(!and.check(&user));
        let or = AuthPolicy::Or(vec![
            AuthPolicy::AdminOnly,
            AuthPolicy::HasRole(vec!["coach".into()]),
        ]);
        assert!(or.check(&user));
    }

    #[test]
    fn test_policy_check_custom() {
        fn only_u_coach(subject: &Subject) -> bool {
            subject.user_id() == Some("u-coach")
        }
        let policy = AuthPolicy::Custom(only_u_coach);
        assert!(policy.check(&coach()));
        assert!(!policy.check(&Subject::Anonymous));
    }

    #[test]
    fn test_parse_policy() {
        assert!(matches!(
            AuthPolicy::parse_policy("public"),
            Some(AuthPolicy::Public)
        ));
        assert!(matches!(
            AuthPolicy::parse_policy(" authenticated "),
            Some(AuthPolicy::Authenticated)
        ));
        match AuthPolicy::parse_policy("role:coach") {
            Some(AuthPolicy::HasRole(roles)) => assert_eq!(roles, vec!["coach"]),
            other => panic!("Expected HasRole, got {:?}", other),
        }
        match AuthPolicy::parse_policy("any_role:coach, parent") {
            Some(AuthPolicy::HasRole(roles)) => assert_eq!(roles, vec!["coach", "parent"]),
            other => panic!("Expected HasRole, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_policy_rejects_unknown() {
        assert!(AuthPolicy::parse_policy("everyone").is_none());
        assert!(AuthPolicy::parse_policy("role:").is_none());
        assert!(AuthPolicy::parse_policy("any_role: , ").is_none());
    }

    #[test]
    fn test_policy_guard_defaults_to_deny() {
        let guard = PolicyGuard::new().allow(
            AccessService::Project,
            "player",
            AccessOperation::Read,
            AuthPolicy::Authenticated,
        );
        let user = coach();
        assert!(guard.has_access("player", AccessOperation::Read, AccessService::Project, &user));
        assert!(!guard.has_access("player", AccessOperation::Update, AccessService::Project, &user));
        assert!(!guard.has_access("player", AccessOperation::Read, AccessService::Platform, &user));
        assert!(!guard.has_access("academy", AccessOperation::Read, AccessService::Project, &user));
    }

    #[test]
    fn test_allow_all_operations() {
        let guard = PolicyGuard::new().allow_all_operations(
            AccessService::Project,
            "academy",
            AuthPolicy::HasRole(vec!["owner".into()]),
        );
        let owner = Subject::user("u-owner", ["owner"]);
        for operation in AccessOperation::ALL {
            assert!(guard.has_access("academy", operation, AccessService::Project, &owner));
            assert!(!guard.has_access("academy", operation, AccessService::Project, &coach()));
        }
    }

    #[test]
    fn test_access_context_require() {
        let ctx = AccessContext::new(Arc::new(DenyAll), coach(), AccessService::Project);
        match ctx.require("player", AccessOperation::Update) {
            Err(AdminError::AccessDenied {
                entity_type,
                operation,
                ..
            }) => {
                assert_eq!(entity_type, "player");
                assert_eq!(operation, AccessOperation::Update);
            }
            other => panic!("Expected AccessDenied, got {:?}", other),
        }

        let ctx = AccessContext::new(Arc::new(AllowAll), Subject::Anonymous, AccessService::Project);
        assert!(ctx.require("player", AccessOperation::Delete).is_ok());
    }

    #[test]
    fn test_subject_accessors() {
        let user = Subject::User {
            user_id: "u1".to_string(),
            tenant_id: Some("t1".to_string()),
            roles: vec![],
        };
        assert_eq!(user.user_id(), Some("u1"));
        assert_eq!(user.tenant_id(), Some("t1"));
        assert!(!user.is_admin());
        assert_eq!(Subject::Anonymous.user_id(), None);
    }
}
