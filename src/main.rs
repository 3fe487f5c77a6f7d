//! MCP Server Entry Point
//!
//! Loads configuration (environment, then command-line flags), initializes
//! logging, and serves the Walmart tools on the configured transport.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use walmart_mcp_server::core::{Cli, Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment, then apply flags
    let mut config = Config::from_env();
    cli.apply(&mut config)
        .context("invalid command-line options")?;

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = McpServer::new(config.clone()).context("failed to initialize server")?;

    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout belongs to the STDIO transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
