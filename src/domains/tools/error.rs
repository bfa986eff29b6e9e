//! Tool-specific error types.

use rmcp::model::{CallToolResult, Content};
use thiserror::Error;
use tracing::warn;

use super::schema::ValidationError;
use crate::core::backend::BackendError;

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The arguments could not be read into the tool's parameter shape.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A field broke one of its constraints.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The request is well-formed but refers to something that does not exist.
    #[error("Domain error: {0}")]
    Domain(String),

    /// Configuration, network, status or decoding failure talking to the backend.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new domain error.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    /// Short machine-readable category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InvalidArguments(_) | Self::Validation(_) => "validation",
            Self::Domain(_) => "domain",
            Self::Backend(e) if e.is_config() => "configuration",
            Self::Backend(BackendError::Status { .. }) => "backend",
            Self::Backend(BackendError::Protocol(_)) => "protocol",
            Self::Backend(BackendError::Timeout) => "timeout",
            Self::Backend(_) => "network",
        }
    }

    /// Render as an MCP tool error result (`isError: true`).
    pub fn into_call_result(self) -> CallToolResult {
        warn!(kind = self.kind(), "Tool call failed: {}", self);
        CallToolResult::error(vec![Content::text(self.to_string())])
    }
}
