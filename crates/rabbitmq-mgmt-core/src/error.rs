//! Error types for management API operations.
//!
//! The RabbitMQ management plugin owns the semantics of every endpoint this
//! client talks to; errors here are therefore transport- and status-shaped
//! rather than domain-shaped.

use thiserror::Error;

/// Main error type for management API operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint or request path
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout talking to management endpoint: {0}")]
    Timeout(String),

    /// Management endpoint is unreachable or returned a 5xx/429
    #[error("Management endpoint unavailable: {0}")]
    ServiceUnavailable(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request rejected by the server (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Credentials rejected (401/403)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Conflicting state on the server (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Failed to encode a request body or decode a response body
    #[error("Failed to parse management response: {0}")]
    ParseError(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Specialized result type for management API operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::AuthFailed(_) => "AUTH_FAILED",
            Self::Conflict(_) => "CONFLICT",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// Returns true for transport-level failures where retrying could
    /// plausibly succeed. Status-derived errors are retried only when the
    /// server signalled unavailability.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::ServiceUnavailable(_) | Self::HttpError(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
        assert_eq!(
            Error::HttpError("test".to_string()).error_code(),
            "HTTP_ERROR"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::ServiceUnavailable("test".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            Error::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            Error::BadRequest("test".to_string()).error_code(),
            "BAD_REQUEST"
        );
        assert_eq!(
            Error::AuthFailed("test".to_string()).error_code(),
            "AUTH_FAILED"
        );
        assert_eq!(Error::Conflict("test".to_string()).error_code(), "CONFLICT");
        assert_eq!(
            Error::ParseError("test".to_string()).error_code(),
            "PARSE_ERROR"
        );
        assert_eq!(
            Error::ValidationError("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("queues/%2F/missing".to_string());
        assert_eq!(err.to_string(), "Not found: queues/%2F/missing");

        let err = Error::AuthFailed("guest".to_string());
        assert_eq!(err.to_string(), "Authentication failed: guest");
    }

    #[test]
    fn test_is_transient() {
        assert!(Error::Timeout("t".to_string()).is_transient());
        assert!(Error::ServiceUnavailable("t".to_string()).is_transient());
        assert!(Error::HttpError("t".to_string()).is_transient());

        assert!(!Error::NotFound("t".to_string()).is_transient());
        assert!(!Error::AuthFailed("t".to_string()).is_transient());
        assert!(!Error::BadRequest("t".to_string()).is_transient());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let mgmt_err: Error = err.into();
        assert!(matches!(mgmt_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let mgmt_err: Error = err.into();
        assert!(matches!(mgmt_err, Error::ParseError(_)));
    }

    #[test]
    fn test_error_clone_and_eq() {
        let err = Error::Conflict("queue exists".to_string());
        let cloned = err.clone();
        assert_eq!(err, cloned);
        assert_ne!(err, Error::Conflict("other".to_string()));
    }
}
