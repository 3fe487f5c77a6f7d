//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, command-line flags, server
//! lifecycle management, and transport layer abstractions.

pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use cli::Cli;
pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
