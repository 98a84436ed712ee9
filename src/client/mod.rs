//! HTTP client for the admin REST API
//!
//! [`ApiClient`] owns the connection pool, base URL and session token;
//! [`ResourceClient`] is its typed view over one collection.

mod resource;

pub use resource::ResourceClient;

use crate::config::ApiConfig;
use crate::core::error::{AdminError, AdminResult, ConfigError};
use crate::core::resource::Resource;
use std::time::Duration;

/// Shared API connection
///
/// Cheap to clone: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Client with default transport settings
    pub fn new(base_url: &str) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Client over an existing `reqwest::Client`
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Client built from the `api` section of the configuration
    ///
    /// The configured timeout is enforced by the transport; the client itself
    /// never retries.
    pub fn from_config(config: &ApiConfig) -> AdminResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                AdminError::Config(ConfigError::InvalidValue {
                    field: "api".to_string(),
                    value: config.base_url.clone(),
                    message: e.to_string(),
                })
            })?;
        let client = Self::with_http(http, &config.base_url);
        Ok(match &config.token {
            Some(token) => client.with_token(token),
            None => client,
        })
    }

    /// Attach a bearer session token to every request
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Typed client for one resource
    pub fn resource<T: Resource>(&self) -> ResourceClient<T> {
        ResourceClient::new(self.clone())
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:3000/api/");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_from_config_keeps_token() {
        let config = ApiConfig {
            base_url: "http://localhost:3000".to_string(),
            timeout_ms: 500,
            token: Some("session-token".to_string()),
        };
        let client = ApiClient::from_config(&config).expect("client should build");
        assert_eq!(client.token(), Some("session-token"));
    }
}
