//! Access-token resolution for outbound Walmart API calls.
//!
//! Every invocation carries its own [`CredentialContext`], filled in by the
//! transport from the incoming request. The resolver prefers that per-call
//! token and falls back to the process-wide key loaded at startup. Nothing is
//! cached between calls.

use std::fmt;

use rmcp::model::{JsonObject, Meta};

use super::error::ToolError;

/// HTTP header carrying the caller's Walmart token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// `_meta` keys checked on `tools/call` requests.
const META_TOKEN_KEYS: [&str; 2] = ["authToken", AUTH_TOKEN_HEADER];

/// A resolved Walmart access token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the outbound header only.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form safe for logs: the last four characters at most.
    pub fn redacted(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "[REDACTED]".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("[REDACTED]…{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.redacted()).finish()
    }
}

/// Request-scoped credential input.
#[derive(Clone, Default)]
pub struct CredentialContext {
    token: Option<String>,
}

impl CredentialContext {
    /// Build from an optional raw value.
    pub fn from_optional(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { token }
    }

    /// Build from the `_meta` object of an MCP request.
    pub fn from_meta(meta: &Meta) -> Self {
        Self::from_meta_object(meta)
    }

    /// Build from a raw `_meta` JSON object.
    pub fn from_meta_object(meta: &JsonObject) -> Self {
        let token = META_TOKEN_KEYS
            .iter()
            .find_map(|key| meta.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string);
        Self::from_optional(token)
    }

    /// Whether a caller token is present.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

#[cfg(test)]
impl CredentialContext {
    /// Context with no caller-supplied token.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context carrying the given caller token (blank values count as absent).
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::from_optional(Some(token.into()))
    }
}

impl fmt::Debug for CredentialContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialContext")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Resolves the token for one invocation.
#[derive(Clone, Default)]
pub struct CredentialResolver {
    fallback: Option<String>,
}

impl CredentialResolver {
    /// Create a resolver with an optional process-wide fallback token.
    pub fn new(fallback: Option<String>) -> Self {
        let fallback = fallback.filter(|t| !t.trim().is_empty());
        Self { fallback }
    }

    /// Resolve the token: call context first, then the process fallback.
    pub fn resolve(&self, context: &CredentialContext) -> Result<Credential, ToolError> {
        if let Some(token) = &context.token {
            return Ok(Credential::new(token.clone()));
        }
        self.fallback
            .as_ref()
            .map(|token| Credential::new(token.clone()))
            .ok_or(ToolError::MissingCredential)
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("fallback", &self.fallback.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
