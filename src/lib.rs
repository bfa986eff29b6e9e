//! Finance MCP Server Library
//!
//! A Model Context Protocol gateway for a personal finance HTTP backend.
//! Every tool validates its arguments, resolves the backend path from a
//! configurable `section -> operation -> path` map, calls the backend and
//! relays its JSON response.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, the backend client, the MCP server and
//!   its transports
//! - **domains::tools**: the finance tools, their validation and dispatch
//!
//! # Example
//!
//! ```rust,no_run
//! use finance_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = McpServer::new(config)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
