//! Configuration management for the MCP server.
//!
//! Configuration comes from three places, in increasing precedence:
//! built-in defaults, the endpoints YAML file (`ENDPOINTS_CONFIG`, default
//! `config.endpoints.yaml`) and environment variables (optionally loaded
//! from a `.env` file).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::backend::{EndpointMap, normalize_base_url};
use super::error::{Error, Result};
use super::transport::TransportConfig;

/// Default location of the endpoints file.
pub const DEFAULT_ENDPOINTS_CONFIG: &str = "config.endpoints.yaml";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Finance backend location, headers and endpoint map.
    pub backend: BackendConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Finance backend configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,

    /// `section -> operation -> path template`.
    pub endpoints: EndpointMap,

    /// Static headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Header values may hold credentials, so only their names are printed.
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("endpoints", &self.endpoints.len())
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// On-disk shape of the endpoints file.
#[derive(Debug, Default, Deserialize)]
struct EndpointsFile {
    #[serde(default)]
    base_url: Option<String>,

    #[serde(default)]
    headers: BTreeMap<String, String>,

    #[serde(default)]
    endpoints: EndpointMap,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            endpoints: EndpointMap::default(),
            headers: BTreeMap::new(),
        }
    }
}

impl BackendConfig {
    /// Parse an endpoints document, letting `base_url_override` win over the
    /// document's own `base_url`.
    pub fn from_yaml(yaml: &str, base_url_override: Option<String>) -> Result<Self> {
        let file: EndpointsFile = if yaml.trim().is_empty() {
            EndpointsFile::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| Error::config(format!("Invalid endpoints configuration: {}", e)))?
        };

        let base_url = base_url_override
            .filter(|url| !url.trim().is_empty())
            .or(file.base_url)
            .ok_or_else(|| Error::config("Missing base_url in config or BASE_URL env"))?;
        let base_url = normalize_base_url(&base_url)?;

        Ok(Self {
            base_url,
            endpoints: file.endpoints,
            headers: file.headers,
        })
    }

    /// Read and parse an endpoints file.
    pub fn from_file(path: &Path, base_url_override: Option<String>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Cannot read endpoints configuration {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&yaml, base_url_override)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "finance-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            backend: BackendConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the endpoints file and environment variables.
    ///
    /// Recognized variables: `ENDPOINTS_CONFIG`, `BASE_URL`, `MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, plus the `MCP_TRANSPORT`/`MCP_TCP_*`/`MCP_HTTP_*`
    /// transport settings.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let endpoints_path = std::env::var("ENDPOINTS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENDPOINTS_CONFIG));
        let base_url = std::env::var("BASE_URL").ok();

        let mut config = Self::load(&endpoints_path, base_url)?;

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        Ok(config)
    }

    /// Build a configuration from an endpoints file, without reading the
    /// environment.
    pub fn load(endpoints_path: &Path, base_url_override: Option<String>) -> Result<Self> {
        let backend = BackendConfig::from_file(endpoints_path, base_url_override)?;

        Ok(Self {
            backend,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::EndpointKey;
    use crate::core::ENV_TEST_LOCK;
    use std::io::Write;

    const YAML: &str = r#"
base_url: "http://localhost:8080/"
headers:
  X-Client: finance-mcp
endpoints:
  balance:
    balance: /balance
    mensual: /balance/mensual/{ano}/{mes}
  categorias:
    listar: /categorias
"#;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_yaml_reads_everything() {
        let backend = BackendConfig::from_yaml(YAML, None).unwrap();
        assert_eq!(backend.base_url, "http://localhost:8080");
        assert_eq!(backend.endpoints.len(), 3);
        assert!(
            backend
                .endpoints
                .contains(EndpointKey::new("categorias", "listar"))
        );
        assert_eq!(backend.headers.get("X-Client").unwrap(), "finance-mcp");
    }

    #[test]
    fn test_base_url_override_wins() {
        let backend =
            BackendConfig::from_yaml(YAML, Some("https://finance.internal/api".to_string()))
                .unwrap();
        assert_eq!(backend.base_url, "https://finance.internal/api");
    }

    #[test]
    fn test_missing_base_url_is_fatal() {
        let yaml = "endpoints:\n  balance:\n    balance: /balance\n";
        let err = BackendConfig::from_yaml(yaml, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_empty_document_with_override() {
        let backend =
            BackendConfig::from_yaml("", Some("http://127.0.0.1:9000".to_string())).unwrap();
        assert!(backend.endpoints.is_empty());
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = BackendConfig::from_yaml("base_url: \"ftp://files\"\n", None).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = BackendConfig::from_yaml("endpoints: [1, 2", None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let file = write_yaml(YAML);
        let config = Config::load(file.path(), None).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8080");
        assert_eq!(config.server.name, "finance-mcp");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = Config::load(Path::new("/definitely/not/here.yaml"), None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_env_base_url_override() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        let file = write_yaml(YAML);
        unsafe {
            std::env::set_var("ENDPOINTS_CONFIG", file.path());
            std::env::set_var("BASE_URL", "http://10.0.0.5:8080");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.backend.base_url, "http://10.0.0.5:8080");
        unsafe {
            std::env::remove_var("ENDPOINTS_CONFIG");
            std::env::remove_var("BASE_URL");
        }
    }

    #[test]
    fn test_headers_redacted_in_debug() {
        let mut backend = BackendConfig::default();
        backend
            .headers
            .insert("Authorization".to_string(), "Bearer super_secret".to_string());
        let debug_str = format!("{:?}", backend);
        assert!(debug_str.contains("Authorization"));
        assert!(!debug_str.contains("super_secret"));
    }
}
