//! Tool-specific error types.

use thiserror::Error;

/// Message returned to callers when no access token can be resolved.
pub const MISSING_TOKEN_MESSAGE: &str = "Missing Walmart API token";

/// Errors that can occur while dispatching a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not registered in the catalog.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// No access token in the call context nor in the process environment.
    #[error("Missing Walmart API token")]
    MissingCredential,

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Errors raised by the outbound catalog call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status.
    #[error("Unexpected status {status}")]
    Status {
        status: u16,
        body: String,
    },

    /// The API answered 2xx but the body is not JSON.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport("request timed out".to_string())
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}
