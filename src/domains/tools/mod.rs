//! Tools domain module.
//!
//! Every MCP tool this server exposes forwards one operation to the finance
//! backend. Tools validate their arguments, build a request through the
//! endpoint map and relay the backend's JSON unchanged.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool implementations, one file per backend section
//! - `schema.rs` - Field validators shared by the tools
//! - `router.rs` - rmcp ToolRouter for STDIO/TCP transport
//! - `registry.rs` - Tool listing and dispatch by name
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Implement `FinanceTool` in the matching `definitions/` file
//! 2. Export it in `definitions/mod.rs`
//! 3. Add its route in `router.rs`
//! 4. Register it in `registry.rs`

pub mod definitions;
mod error;
mod registry;
pub mod router;
pub mod schema;

pub use error::{ToolError, ToolResult};
pub use registry::ToolRegistry;
pub use router::build_tool_router;
