//! Outgoing request headers.
//!
//! All backend calls ask a single [`HeaderProvider`] for their headers. The
//! default provider sends a fixed set taken from configuration; an
//! authenticating provider can replace it without touching any tool.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::error::{BackendError, BackendResult};

/// Supplies the headers attached to every backend request.
#[async_trait::async_trait]
pub trait HeaderProvider: Send + Sync {
    /// Headers for the next request.
    async fn headers(&self) -> BackendResult<HeaderMap>;
}

/// Fixed headers, validated once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders {
    headers: HeaderMap,
}

impl StaticHeaders {
    /// Build from configured name/value pairs.
    pub fn from_pairs(pairs: &BTreeMap<String, String>) -> BackendResult<Self> {
        let mut headers = HeaderMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| BackendError::config(format!("Invalid header name '{}'", name)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| BackendError::config(format!("Invalid value for header '{}'", name)))?;
            headers.insert(header_name, header_value);
        }
        Ok(Self { headers })
    }
}

#[async_trait::async_trait]
impl HeaderProvider for StaticHeaders {
    async fn headers(&self) -> BackendResult<HeaderMap> {
        Ok(self.headers.clone())
    }
}
