//! Walmart MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing three Walmart catalog
//! tools: product search, store search and category search. Each call is
//! validated, authenticated with a per-request token, translated into one
//! outbound Walmart API request, and the response body is returned verbatim.
//!
//! # Architecture
//!
//! - **core**: configuration, command-line flags, error handling, the MCP
//!   server handler and the STDIO / HTTP transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: catalog, request builders, credentials and the dispatcher
//!
//! # Example
//!
//! ```rust,no_run
//! use walmart_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
