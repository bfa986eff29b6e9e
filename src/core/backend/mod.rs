//! Finance backend access.
//!
//! - `endpoints`: configuration-driven `section.operation -> path` resolution
//! - `client`: the HTTP executor shared by every tool
//! - `headers`: the single extension point for outgoing headers (auth)

mod client;
mod endpoints;
mod error;
mod headers;

pub use client::{BackendClient, CONNECT_TIMEOUT, REQUEST_TIMEOUT, RemoteCall, normalize_base_url};
pub use endpoints::{EndpointKey, EndpointMap};
pub use error::{BackendError, BackendResult};
pub use headers::{HeaderProvider, StaticHeaders};
