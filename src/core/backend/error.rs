//! Backend call error types.

use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised while resolving or executing a call against the finance backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No path template is configured for the endpoint key.
    #[error("Configuration error: missing endpoint mapping for {section}.{operation}")]
    MissingEndpoint { section: String, operation: String },

    /// The path template needs a variable the caller did not provide.
    #[error(
        "Configuration error: endpoint {section}.{operation} requires path variable '{variable}'"
    )]
    MissingPathVariable {
        section: String,
        operation: String,
        variable: String,
    },

    /// The path template could not be parsed.
    #[error("Configuration error: malformed template for {section}.{operation}: {template}")]
    MalformedTemplate {
        section: String,
        operation: String,
        template: String,
    },

    /// Base URL, headers or HTTP client could not be set up.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend answered with a non-success status.
    #[error("Backend error (status {status}): {body}")]
    Status { status: u16, body: String },

    /// The backend answered with a success status but the body is not JSON.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The request did not complete within the configured timeout.
    #[error("Backend request timed out")]
    Timeout,

    /// Connection-level failure talking to the backend.
    #[error("Network error: {0}")]
    Network(String),
}

impl BackendError {
    /// Create a missing endpoint error.
    pub fn missing_endpoint(section: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::MissingEndpoint {
            section: section.into(),
            operation: operation.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Whether this error comes from configuration rather than the network.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::MissingEndpoint { .. }
                | Self::MissingPathVariable { .. }
                | Self::MalformedTemplate { .. }
                | Self::Config(_)
        )
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Protocol(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
