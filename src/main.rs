//! Finance MCP server entry point.
//!
//! Loads configuration (endpoints file, `.env` and environment), initializes
//! logging, checks the endpoint map and serves on the configured transport.

use anyhow::{Context, Result};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use finance_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!(
        base_url = %config.backend.base_url,
        endpoints = config.backend.endpoints.len(),
        "Finance backend"
    );

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config).context("Failed to create MCP server")?;

    let missing = server.missing_endpoints();
    if !missing.is_empty() {
        warn!(
            "{} endpoint mapping(s) missing; the tools using them will fail",
            missing.len()
        );
    }

    transport.run(server).await?;

    info!("Server shutting down");
    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout belongs to the STDIO transport. `RUST_LOG`
/// directives are honored on top of the configured level.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
