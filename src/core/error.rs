//! Error types and handling for the MCP server.
//!
//! This module defines the application-level error type used during startup
//! and by callers that embed the server as a library. Tool calls have their
//! own error type, see `domains::tools::ToolError`.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error raised while setting up the backend client.
    #[error(transparent)]
    Backend(#[from] super::backend::BackendError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failures.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the server failed before serving anything because of its
    /// configuration.
    pub fn is_config(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::Backend(e) => e.is_config(),
            Self::Transport(_) => false,
        }
    }
}
