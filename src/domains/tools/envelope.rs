//! Uniform result shape returned for every tool invocation.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::value::RawValue;

/// Success payload straight from the backend, or `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResultEnvelope {
    /// Backend JSON body, unmodified.
    Success(Box<RawValue>),
    /// Failure description safe to show to the caller.
    Failure { error: String },
}

impl ResultEnvelope {
    /// Wrap a backend body.
    pub fn success(body: Box<RawValue>) -> Self {
        Self::Success(body)
    }

    /// Build a failure envelope.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    /// JSON text of the envelope. Success bodies are emitted byte-for-byte.
    pub fn to_json_string(&self) -> String {
        match self {
            Self::Success(body) => body.get().to_string(),
            Self::Failure { error } => serde_json::json!({ "error": error }).to_string(),
        }
    }

    /// Convert into an MCP tool result.
    ///
    /// Failures stay success-shaped: callers check the `error` field.
    pub fn into_call_result(self) -> CallToolResult {
        CallToolResult::success(vec![Content::text(self.to_json_string())])
    }

    /// JSON value form used by the HTTP transport. Same shape as
    /// [`Self::into_call_result`].
    pub fn to_call_result_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.clone().into_call_result())
    }
}

#[cfg(test)]
impl ResultEnvelope {
    /// The error message, if this is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success(_) => None,
        }
    }
}
