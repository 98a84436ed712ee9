//! Configuration loading and management

use crate::core::auth::{AccessOperation, AccessService, AuthPolicy, PolicyGuard};
use crate::core::entity_registry::{EntityDescriptor, EntityRegistry, default_descriptors};
use crate::core::error::{AdminResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection settings of the REST API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. "http://localhost:3000/api"
    pub base_url: String,

    /// Transport timeout per request, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Bearer session token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_ms: default_timeout_ms(),
            token: None,
        }
    }
}

/// Policies of one entity, one string per operation
///
/// Operations left out are denied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAuthConfig {
    pub entity: String,

    #[serde(default)]
    pub service: AccessService,

    /// Examples: "public", "authenticated", "role:coach", "any_role:owner,coach"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<String>,
}

impl EntityAuthConfig {
    /// Same policy for every operation
    pub fn uniform(entity: &str, policy: &str) -> Self {
        Self {
            entity: entity.to_string(),
            service: AccessService::Project,
            create: Some(policy.to_string()),
            read: Some(policy.to_string()),
            update: Some(policy.to_string()),
            delete: Some(policy.to_string()),
        }
    }

    fn policy_str(&self, operation: AccessOperation) -> Option<&str> {
        match operation {
            AccessOperation::Create => self.create.as_deref(),
            AccessOperation::Read => self.read.as_deref(),
            AccessOperation::Update => self.update.as_deref(),
            AccessOperation::Delete => self.delete.as_deref(),
        }
    }
}

/// Complete configuration of the admin core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub api: ApiConfig,

    /// Route → entity mappings
    #[serde(default = "default_descriptors")]
    pub routes: Vec<EntityDescriptor>,

    #[serde(default)]
    pub permissions: Vec<EntityAuthConfig>,
}

impl AdminConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> AdminResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: format!("{}: {}", path.display(), e),
            },
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            routes = config.routes.len(),
            permissions = config.permissions.len(),
            "loaded admin configuration"
        );
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> AdminResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later at request time
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.api.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                value: base.clone(),
                message: "expected an http:// or https:// URL".to_string(),
            });
        }

        if let Some(route) = self.routes.iter().find(|r| r.route_name.is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "routes".to_string(),
                value: route.entity_name.clone(),
                message: "route_name must not be empty".to_string(),
            });
        }

        for entry in &self.permissions {
            for operation in AccessOperation::ALL {
                let Some(policy) = entry.policy_str(operation) else {
                    continue;
                };
                if AuthPolicy::parse_policy(policy).is_none() {
                    return Err(ConfigError::InvalidValue {
                        field: format!("permissions.{}.{}", entry.entity, operation),
                        value: policy.to_string(),
                        message: "unknown policy".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Registry built from the configured routes
    pub fn registry(&self) -> EntityRegistry {
        EntityRegistry::from_descriptors(self.routes.iter().cloned())
    }

    /// Guard answering from the configured permissions
    pub fn access_guard(&self) -> PolicyGuard {
        let mut guard = PolicyGuard::new();
        for entry in &self.permissions {
            for operation in AccessOperation::ALL {
                if let Some(policy) = entry.policy_str(operation).and_then(AuthPolicy::parse_policy)
                {
                    guard.set_policy(entry.service, &entry.entity, operation, policy);
                }
            }
        }
        guard
    }

    /// The original application's routes, open to any signed-in user
    pub fn default_config() -> Self {
        Self {
            api: ApiConfig::default(),
            routes: default_descriptors(),
            permissions: default_descriptors()
                .iter()
                .map(|d| EntityAuthConfig::uniform(&d.entity_name, "authenticated"))
                .collect(),
        }
    }
}
