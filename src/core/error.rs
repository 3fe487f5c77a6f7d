//! Error types and handling for the MCP server.
//!
//! These are startup errors: building the outbound client and validating
//! configuration. Per-call failures never surface here; they travel inside the
//! tool result envelope.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error while setting up the outbound catalog client.
    #[error("Backend error: {0}")]
    Backend(#[from] crate::domains::tools::BackendError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
