//! Configuration for the management endpoint.
//!
//! Connection settings for a RabbitMQ node's management plugin: the endpoint
//! URL, static basic-auth credentials, TLS options, and request limits. All
//! API paths are resolved against the `/api/` root this configuration yields.

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default management endpoint exposed by the `rabbitmq_management` plugin.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:15672";

/// Default management username.
pub const DEFAULT_USERNAME: &str = "guest";

/// Default management password.
pub const DEFAULT_PASSWORD: &str = "guest";

/// Configuration for a management API client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ManagementConfig {
    /// Management endpoint base URL, without the `/api/` suffix
    #[validate(url)]
    pub endpoint: String,

    /// Basic-auth username
    #[serde(default = "default_username")]
    pub username: String,

    /// Basic-auth password (redacted in Debug output, never serialized)
    #[serde(skip_serializing, default = "default_password")]
    pub password: SecretString,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to a custom CA certificate
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tls_ca_cert: Option<std::path::PathBuf>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of retry attempts (0 = no retries, the default)
    #[validate(range(min = 0, max = 10))]
    #[serde(default)]
    pub max_retries: u32,
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

fn default_password() -> SecretString {
    SecretString::from(DEFAULT_PASSWORD)
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl ManagementConfig {
    /// Create a new configuration for the given endpoint with guest credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            endpoint: endpoint.into(),
            username: default_username(),
            password: default_password(),
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: 0,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the basic-auth credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = SecretString::from(password.into());
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set a custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: std::path::PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Expose the configured password for constructing an Authorization header.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Parse the endpoint and return the `/api/` root all operations resolve against.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be parsed as a URL.
    pub fn parse_api_root(&self) -> Result<Url, Error> {
        let root = format!("{}/api/", self.endpoint.trim_end_matches('/'));
        Url::parse(&root)
            .map_err(|e| Error::ConfigError(format!("Invalid management endpoint: {e}")))
    }
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            username: default_username(),
            password: default_password(),
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ManagementConfig::default();
        assert_eq!(config.endpoint, "http://localhost:15672");
        assert_eq!(config.username, "guest");
        assert_eq!(config.password(), "guest");
        assert!(config.tls_verify);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_new_validates_url() {
        assert!(ManagementConfig::new("http://rabbit.example.com:15672").is_ok());
        assert!(matches!(
            ManagementConfig::new("not a url"),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_parse_api_root_appends_api_prefix() {
        let config = ManagementConfig::default();
        let root = config.parse_api_root().unwrap();
        assert_eq!(root.as_str(), "http://localhost:15672/api/");
    }

    #[test]
    fn test_parse_api_root_tolerates_trailing_slash() {
        let config = ManagementConfig::new("http://rabbit:15672/").unwrap();
        let root = config.parse_api_root().unwrap();
        assert_eq!(root.as_str(), "http://rabbit:15672/api/");
    }

    #[test]
    fn test_builder_setters() {
        let config = ManagementConfig::new("https://rabbit:15671")
            .unwrap()
            .with_credentials("monitor", "s3cret")
            .with_tls_verify(false)
            .with_timeout(60)
            .with_max_retries(2);

        assert_eq!(config.username, "monitor");
        assert_eq!(config.password(), "s3cret");
        assert!(!config.tls_verify);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_password_not_serialized() {
        let config = ManagementConfig::default().with_credentials("guest", "hunter2");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ManagementConfig::default().with_credentials("guest", "hunter2");
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
    }
}
