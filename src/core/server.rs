//! MCP Server implementation and lifecycle management.
//!
//! The server owns the shared backend client and exposes the finance tools.
//! rmcp-driven transports (STDIO/TCP) go through the ToolRouter; the HTTP
//! transport dispatches through the ToolRegistry. Both share the same tool
//! implementations and the same backend client.

use rmcp::{
    ErrorData as McpError, ServerHandler, handler::server::tool::ToolRouter, model::*,
    tool_handler,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::backend::{BackendClient, EndpointKey};
use super::config::Config;
use super::error::Result as ServerResult;
use crate::domains::tools::definitions::common::into_call_result;
use crate::domains::tools::{ToolError, ToolRegistry, build_tool_router};

const INSTRUCTIONS: &str = "Personal finance assistant tools. Query balances (by date range, \
month or accumulated), manage categories, fixed expenses and movements, and read monthly \
trends and next-month projections. Dates use yyyy-MM-dd, months yyyy-MM, movement types \
INGRESO or EGRESO.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registry used for name-based dispatch.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server, building the backend client from configuration.
    pub fn new(config: Config) -> ServerResult<Self> {
        let backend = Arc::new(BackendClient::new(&config.backend)?);
        Ok(Self::with_backend(config, backend))
    }

    /// Create a server around an existing backend client.
    pub fn with_backend(config: Config, backend: Arc<BackendClient>) -> Self {
        info!(
            base_url = backend.base_url(),
            endpoints = backend.endpoints().len(),
            "Backend configured"
        );
        Self {
            config: Arc::new(config),
            registry: Arc::new(ToolRegistry::new(backend.clone())),
            tool_router: build_tool_router::<Self>(backend),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Endpoint keys the tools need but the configuration lacks.
    pub fn missing_endpoints(&self) -> Vec<EndpointKey> {
        self.registry.missing_endpoints()
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<Value> {
        ToolRegistry::get_all_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Unknown tools and malformed arguments are protocol errors, as on the
    /// rmcp routes; every other failure is a tool result with `isError`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, McpError> {
        match self.registry.call_tool(name, arguments).await {
            Err(e @ (ToolError::NotFound(_) | ToolError::InvalidArguments(_))) => {
                Err(McpError::invalid_params(e.to_string(), None))
            }
            outcome => Ok(into_call_result(outcome)),
        }
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
