//! Remote call executor for the finance backend.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::endpoints::{EndpointKey, EndpointMap};
use super::error::{BackendError, BackendResult};
use super::headers::{HeaderProvider, StaticHeaders};
use crate::core::config::BackendConfig;

/// Overall request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

/// Connection establishment timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully prepared backend request, before path resolution.
///
/// Tools build one of these from validated arguments; nothing here touches
/// the network, so the shape of every call can be checked in isolation.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    pub endpoint: EndpointKey,
    pub method: Method,
    pub path_vars: Vec<(&'static str, String)>,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl RemoteCall {
    pub fn new(method: Method, endpoint: EndpointKey) -> Self {
        Self {
            endpoint,
            method,
            path_vars: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(endpoint: EndpointKey) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: EndpointKey) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn with_path_var(mut self, name: &'static str, value: impl ToString) -> Self {
        self.path_vars.push((name, value.to_string()));
        self
    }

    pub fn with_query(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }

    /// Add a query parameter only when a value is present.
    pub fn with_optional_query(self, name: &'static str, value: Option<String>) -> Self {
        match value {
            Some(value) => self.with_query(name, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> BackendResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| BackendError::protocol(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Look up a query parameter by name.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// HTTP client bound to one backend base URL and endpoint map.
///
/// Cheap to share behind an `Arc`; everything in it is read-only after
/// construction.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    endpoints: EndpointMap,
    headers: Arc<dyn HeaderProvider>,
    http: Client,
}

impl BackendClient {
    /// Build a client from configuration.
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let headers = StaticHeaders::from_pairs(&config.headers)?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| BackendError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            endpoints: config.endpoints.clone(),
            headers: Arc::new(headers),
            http,
        })
    }

    /// Replace the header provider (e.g. with one that adds authentication).
    pub fn with_header_provider(mut self, provider: Arc<dyn HeaderProvider>) -> Self {
        self.headers = provider;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoints(&self) -> &EndpointMap {
        &self.endpoints
    }

    /// Absolute URL (without query string) a call would be sent to.
    pub fn url_for(&self, call: &RemoteCall) -> BackendResult<String> {
        let path = self.endpoints.resolve(call.endpoint, &call.path_vars)?;
        Ok(format!("{}{}", self.base_url, path))
    }

    /// Send a call and decode the JSON response.
    ///
    /// Non-success statuses become [`BackendError::Status`] carrying the raw
    /// body; a success status with a non-JSON body becomes
    /// [`BackendError::Protocol`]. Nothing is retried.
    #[instrument(skip_all, fields(endpoint = %call.endpoint, method = %call.method))]
    pub async fn execute(&self, call: RemoteCall) -> BackendResult<Value> {
        let url = self.url_for(&call)?;
        debug!(url = %url, query = ?call.query, "Sending backend request");

        let mut request = self
            .http
            .request(call.method.clone(), &url)
            .headers(self.headers.headers().await?);
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("Backend request to {} failed: {}", url, e);
            BackendError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Backend returned an error status");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "Backend responded");
        serde_json::from_str(&body).map_err(|e| {
            warn!("Backend returned a non-JSON body for {}: {}", call.endpoint, e);
            BackendError::protocol(format!(
                "expected a JSON response from {} but could not decode it: {}",
                call.endpoint, e
            ))
        })
    }
}

/// Trim and validate a base URL. The result never ends with `/`.
pub fn normalize_base_url(raw: &str) -> BackendResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(BackendError::config("Backend base URL is empty"));
    }

    let url = reqwest::Url::parse(trimmed)
        .map_err(|e| BackendError::config(format!("Invalid base URL '{}': {}", trimmed, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BackendError::config(format!(
            "Base URL '{}' must use http or https",
            trimmed
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BALANCE: EndpointKey = EndpointKey::new("balance", "balance");
    const MENSUAL: EndpointKey = EndpointKey::new("balance", "mensual");
    const CREAR: EndpointKey = EndpointKey::new("categorias", "crear");

    fn create_config(base_url: &str) -> BackendConfig {
        BackendConfig {
            base_url: base_url.to_string(),
            endpoints: EndpointMap::new()
                .with("balance", "balance", "/balance")
                .with("balance", "mensual", "/balance/mensual/{ano}/{mes}")
                .with("categorias", "crear", "/categorias"),
            headers: Default::default(),
        }
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8080/").unwrap(),
            "http://localhost:8080"
        );
        assert_eq!(
            normalize_base_url(" https://host/api// ").unwrap(),
            "https://host/api"
        );
        assert!(normalize_base_url("").unwrap_err().is_config());
        assert!(normalize_base_url("not a url").unwrap_err().is_config());
        assert!(normalize_base_url("ftp://host").unwrap_err().is_config());
    }

    #[test]
    fn test_url_for_keeps_base_path_prefix() {
        let client = BackendClient::new(&create_config("http://host/api/")).unwrap();
        let call = RemoteCall::get(MENSUAL)
            .with_path_var("ano", 2025)
            .with_path_var("mes", 11);
        assert_eq!(
            client.url_for(&call).unwrap(),
            "http://host/api/balance/mensual/2025/11"
        );
    }

    #[test]
    fn test_remote_call_optional_query() {
        let call = RemoteCall::get(BALANCE)
            .with_optional_query("categoria", None)
            .with_optional_query("desde", Some("2025-11-01".to_string()));
        assert_eq!(call.query.len(), 1);
        assert_eq!(call.query_value("desde"), Some("2025-11-01"));
        assert_eq!(call.query_value("categoria"), None);
    }

    #[tokio::test]
    async fn test_get_with_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/balance"))
            .and(query_param("desde", "2025-11-01"))
            .and(query_param("hasta", "2025-11-30"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ingresos": 1000, "egresos": 400, "neto": 600})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = BackendClient::new(&create_config(&server.uri())).unwrap();
        let call = RemoteCall::get(BALANCE)
            .with_query("desde", "2025-11-01")
            .with_query("hasta", "2025-11-30");

        let result = client.execute(call).await.unwrap();
        assert_eq!(result, json!({"ingresos": 1000, "egresos": 400, "neto": 600}));
    }

    #[tokio::test]
    async fn test_post_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/categorias"))
            .and(body_json(json!({"nombre": "Comida"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7, "nombre": "Comida"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = BackendClient::new(&create_config(&server.uri())).unwrap();
        let call = RemoteCall::post(CREAR)
            .with_json(&json!({"nombre": "Comida"}))
            .unwrap();

        let result = client.execute(call).await.unwrap();
        assert_eq!(result["id"], 7);
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/balance"))
            .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error":"db down"}"#))
            .mount(&server)
            .await;

        let client = BackendClient::new(&create_config(&server.uri())).unwrap();
        let err = client.execute(RemoteCall::get(BALANCE)).await.unwrap_err();

        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, r#"{"error":"db down"}"#);
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_success_is_protocol_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/balance"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = BackendClient::new(&create_config(&server.uri())).unwrap();
        let err = client.execute(RemoteCall::get(BALANCE)).await.unwrap_err();
        assert!(matches!(err, BackendError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_slow_backend_is_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/balance"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"neto": 0}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut client = BackendClient::new(&create_config(&server.uri())).unwrap();
        client.http = Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let err = client.execute(RemoteCall::get(BALANCE)).await.unwrap_err();
        assert!(matches!(err, BackendError::Timeout), "got {err:?}");
        assert!(!err.is_config());
    }

    #[tokio::test]
    async fn test_missing_mapping_never_hits_network() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let client = BackendClient::new(&create_config(&server.uri())).unwrap();
        let err = client
            .execute(RemoteCall::get(EndpointKey::new("balance", "acumulado")))
            .await
            .unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_configured_headers_are_sent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/balance"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"neto": 0})))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = create_config(&server.uri());
        config
            .headers
            .insert("X-Api-Key".to_string(), "secret".to_string());
        let client = BackendClient::new(&config).unwrap();

        let result = client.execute(RemoteCall::get(BALANCE)).await.unwrap();
        assert_eq!(result["neto"], 0);
    }

    #[tokio::test]
    async fn test_custom_header_provider() {
        struct Bearer;

        #[async_trait::async_trait]
        impl HeaderProvider for Bearer {
            async fn headers(&self) -> BackendResult<reqwest::header::HeaderMap> {
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_static("Bearer t0ken"),
                );
                Ok(headers)
            }
        }

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/balance"))
            .and(header("authorization", "Bearer t0ken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = BackendClient::new(&create_config(&server.uri()))
            .unwrap()
            .with_header_provider(Arc::new(Bearer));

        let result = client.execute(RemoteCall::get(BALANCE)).await.unwrap();
        assert_eq!(result, json!([]));
    }
}
