//! Domains module containing the server's business logic.
//!
//! The finance gateway only exposes tools; prompts and resources are not
//! part of its MCP surface.

pub mod tools;
