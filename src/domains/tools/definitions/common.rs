//! Plumbing shared by every finance tool.
//!
//! A tool is a type implementing [`FinanceTool`]: a name, a description, a
//! parameter struct (whose JSON Schema is published to clients), the backend
//! endpoints it touches and an `execute` step. Routing for rmcp and dispatch
//! for the HTTP transport are derived from that.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Instrument, info_span};

use crate::core::backend::{BackendClient, EndpointKey};
use crate::domains::tools::error::{ToolError, ToolResult};

/// A tool forwarding one logical operation to the finance backend.
#[async_trait::async_trait]
pub trait FinanceTool: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Every endpoint key the tool resolves, in call order.
    const ENDPOINTS: &'static [EndpointKey];

    /// Raw arguments as sent by the client.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Validate the arguments, call the backend and return its JSON body.
    async fn execute(params: Self::Params, backend: &BackendClient) -> ToolResult<Value>;
}

/// Read client arguments into a tool's parameter struct.
pub fn parse_params<T: FinanceTool>(arguments: JsonObject) -> ToolResult<T::Params> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Parse and execute in one go.
pub async fn run<T: FinanceTool>(arguments: JsonObject, backend: &BackendClient) -> ToolResult<Value> {
    let params = parse_params::<T>(arguments)?;
    T::execute(params, backend)
        .instrument(info_span!("tool", name = T::NAME))
        .await
}

/// Tool metadata for listing.
pub fn to_tool<T: FinanceTool>() -> Tool {
    Tool {
        name: T::NAME.into(),
        description: Some(T::DESCRIPTION.into()),
        input_schema: cached_schema_for_type::<T::Params>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Create a ToolRoute for the rmcp-driven transports (STDIO/TCP).
pub fn create_route<T, S>(backend: Arc<BackendClient>) -> ToolRoute<S>
where
    T: FinanceTool,
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(to_tool::<T>(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let backend = backend.clone();
        async move {
            let params = parse_params::<T>(args)
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
            Ok(into_call_result(T::execute(params, &backend).await))
        }
        .instrument(info_span!("tool", name = T::NAME))
        .boxed()
    })
}

/// Convert a tool outcome into an MCP result.
pub fn into_call_result(result: ToolResult<Value>) -> CallToolResult {
    match result {
        Ok(value) => success_result(value),
        Err(e) => e.into_call_result(),
    }
}

/// Relay a backend JSON body unchanged.
///
/// Objects are also exposed as structured content; arrays and scalars are
/// only sent as JSON text since structured content must be an object.
pub fn success_result(value: Value) -> CallToolResult {
    if value.is_object() {
        CallToolResult::structured(value)
    } else {
        CallToolResult::success(vec![Content::text(value.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use serde_json::json;

    #[test]
    fn test_success_result_object_is_structured() {
        let result = success_result(json!({"neto": 600}));
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.structured_content, Some(json!({"neto": 600})));
    }

    #[test]
    fn test_success_result_array_is_text() {
        let result = success_result(json!([]));
        assert!(result.structured_content.is_none());
        match &result.content[0].raw {
            RawContent::Text(text) => assert_eq!(text.text, "[]"),
            other => panic!("Expected text content, got {other:?}"),
        }
    }
}
