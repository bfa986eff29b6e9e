//! Transport layer for the MCP server.
//!
//! - **STDIO** (feature `stdio`, default): rmcp over stdin/stdout
//! - **TCP** (feature `tcp`): rmcp over line-delimited JSON-RPC sockets
//! - **HTTP** (feature `http`, default): JSON-RPC over `POST /mcp`
//!
//! `MCP_TRANSPORT` picks one at startup among the compiled-in transports.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
