//! HTTP transport implementation.
//!
//! JSON-RPC 2.0 over `POST` on a single path (default `/mcp`), plus `GET
//! /health` and a `GET /` summary. Stateless: every request is answered on
//! its own, tool calls go through the server's registry.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rmcp::{ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;

const JSONRPC_VERSION: &str = "2.0";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<McpError> for JsonRpcError {
    fn from(e: McpError) -> Self {
        Self {
            code: e.code.0,
            message: e.message.into_owned(),
            data: e.data,
        }
    }
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self::failure(
            id,
            JsonRpcError {
                code,
                message: message.into(),
                data: None,
            },
        )
    }

    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, -32601, format!("Method not found: {}", method))
    }

    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the axum application for a server.
    pub fn router(&self, server: McpServer) -> Router {
        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(server)
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            app = app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }
        app
    }

    /// Run the HTTP transport until the listener fails.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!(
            cors = self.config.enable_cors,
            "Ready - JSON-RPC on POST http://{}{}, health on GET /health",
            addr,
            self.config.rpc_path
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))
    }
}

async fn root_handler(State(server): State<McpServer>) -> impl IntoResponse {
    Json(json!({
        "name": server.name(),
        "version": server.version(),
        "transport": "HTTP",
        "protocol": "JSON-RPC 2.0",
        "tools": server.list_tools().len(),
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn handle_rpc(State(server): State<McpServer>, Json(request): Json<JsonRpcRequest>) -> Response {
    match process_request(&server, request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Answer one JSON-RPC message.
///
/// Notifications (`notifications/*` methods, or any message without an `id`)
/// get no response; the HTTP layer acknowledges them with `202 Accepted`.
pub async fn process_request(
    server: &McpServer,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    if request.method.starts_with("notifications/") {
        debug!("Notification received: {}", request.method);
        return None;
    }
    let is_notification = request.id.is_none();
    let response = answer_request(server, request).await;
    (!is_notification).then_some(response)
}

async fn answer_request(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != JSONRPC_VERSION {
        return JsonRpcResponse::invalid_request(request.id);
    }
    debug!(method = %request.method, "JSON-RPC request");

    match request.method.as_str() {
        "initialize" => match serde_json::to_value(server.get_info()) {
            Ok(info) => JsonRpcResponse::success(request.id, info),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        },
        "ping" => JsonRpcResponse::success(request.id, json!({})),
        "tools/list" => JsonRpcResponse::success(request.id, json!({ "tools": server.list_tools() })),
        "tools/call" => handle_tools_call(server, request).await,
        method => {
            warn!("Unknown method: {}", method);
            JsonRpcResponse::method_not_found(request.id, method)
        }
    }
}

async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let params = request.params.unwrap_or(Value::Null);
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::invalid_params(request.id, "Missing tool name");
    };
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    info!(tool = name, "HTTP tool call");
    match server.call_tool(name, arguments).await {
        Ok(result) => match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        },
        Err(e) => JsonRpcResponse::failure(request.id, e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;

    fn server() -> McpServer {
        McpServer::new(Config::default()).unwrap()
    }

    async fn answer(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
        process_request(server, request)
            .await
            .expect("request with an id gets a response")
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[test]
    fn test_default_address() {
        let transport = HttpTransport::new(HttpConfig::default());
        assert_eq!(transport.address(), "127.0.0.1:8003");
    }

    #[tokio::test]
    async fn test_initialize_reports_tools_only() {
        let response = answer(&server(), request("initialize", None)).await;
        let result = response.result.unwrap();
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["capabilities"]["prompts"].is_null());
        assert_eq!(result["serverInfo"]["name"], "finance-mcp");
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = answer(&server(), request("tools/list", None)).await;
        let tools = response.result.unwrap()["tools"].as_array().unwrap().len();
        assert_eq!(tools, 14);
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let server = server();

        let mut bad_version = request("ping", None);
        bad_version.jsonrpc = "1.0".to_string();
        let response = answer(&server, bad_version).await;
        assert_eq!(response.error.unwrap().code, -32600);

        let response = answer(&server, request("resources/list", None)).await;
        assert_eq!(response.error.unwrap().code, -32601);

        let response = answer(&server, request("tools/call", None)).await;
        assert_eq!(response.error.unwrap().code, -32602);

        let response = answer(
            &server,
            request("tools/call", Some(json!({"name": "does_not_exist"}))),
        )
        .await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_validation_failure_is_tool_error_result() {
        let response = answer(
            &server(),
            request(
                "tools/call",
                Some(json!({"name": "categorias_crear", "arguments": {"nombre": ""}})),
            ),
        )
        .await;
        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("nombre"));
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let server = server();

        let mut initialized = request("notifications/initialized", None);
        initialized.id = None;
        assert!(process_request(&server, initialized).await.is_none());

        let mut ping = request("ping", None);
        ping.id = None;
        assert!(process_request(&server, ping).await.is_none());
    }

    #[tokio::test]
    async fn test_notification_is_accepted_without_body() {
        let transport = HttpTransport::new(HttpConfig::default());
        let app = transport.router(server());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let client = reqwest::Client::new();
        let url = format!("http://{}/mcp", addr);

        let response = client
            .post(&url)
            .json(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
        assert!(response.text().await.unwrap().is_empty());

        let response = client
            .post(&url)
            .json(&json!({"jsonrpc": "2.0", "id": 7, "method": "ping"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["id"], 7);
        assert_eq!(body["result"], json!({}));
    }
}
