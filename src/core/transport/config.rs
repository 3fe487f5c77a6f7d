//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    #[cfg(feature = "stdio")]
    Stdio,

    /// HTTP transport with JSON-RPC over POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Answer with a single JSON body instead of an SSE stream.
    #[serde(default)]
    pub json_response: bool,
}

/// Default HTTP port.
pub const DEFAULT_HTTP_PORT: u16 = 5000;

#[cfg(feature = "http")]
fn default_host() -> String {
    "0.0.0.0".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            return Self::Stdio;
        }

        #[cfg(all(not(feature = "stdio"), feature = "http"))]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(not(any(feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or http");
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
            json_response: false,
        }
    }
}

#[cfg(feature = "http")]
fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl TransportConfig {
    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// HTTP settings from the environment.
    ///
    /// `WALMART_MCP_SERVER_PORT` takes precedence over `MCP_HTTP_PORT`.
    #[cfg(feature = "http")]
    pub fn http_from_env() -> HttpConfig {
        let port = ["WALMART_MCP_SERVER_PORT", "MCP_HTTP_PORT"]
            .iter()
            .find_map(|key| std::env::var(key).ok().and_then(|p| p.parse().ok()))
            .unwrap_or(DEFAULT_HTTP_PORT);
        let host = std::env::var("MCP_HTTP_HOST").unwrap_or_else(|_| default_host());
        let rpc_path = std::env::var("MCP_HTTP_PATH").unwrap_or_else(|_| default_rpc_path());
        let enable_cors = std::env::var("MCP_HTTP_CORS")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);
        let json_response = env_flag("MCP_HTTP_JSON_RESPONSE").unwrap_or(false);
        HttpConfig {
            port,
            host,
            rpc_path,
            enable_cors,
            json_response,
        }
    }

    /// Load transport config from environment variables.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "http")]
            "http" => Self::Http(Self::http_from_env()),
            #[cfg(feature = "stdio")]
            _ => Self::Stdio,
            #[cfg(all(not(feature = "stdio"), feature = "http"))]
            _ => Self::Http(Self::http_from_env()),
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!(
                "HTTP on {}:{}{} ({} responses)",
                cfg.host,
                cfg.port,
                cfg.rpc_path,
                if cfg.json_response { "JSON" } else { "SSE" }
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::tests::ENV_TEST_LOCK;

    fn clear_env() {
        for key in [
            "MCP_TRANSPORT",
            "WALMART_MCP_SERVER_PORT",
            "MCP_HTTP_PORT",
            "MCP_HTTP_HOST",
            "MCP_HTTP_JSON_RESPONSE",
        ] {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_default_is_stdio() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        assert!(matches!(TransportConfig::from_env(), TransportConfig::Stdio));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "HTTP");
            std::env::set_var("MCP_HTTP_PORT", "7000");
            std::env::set_var("WALMART_MCP_SERVER_PORT", "5050");
            std::env::set_var("MCP_HTTP_JSON_RESPONSE", "true");
        }
        match TransportConfig::from_env() {
            TransportConfig::Http(cfg) => {
                assert_eq!(cfg.port, 5050);
                assert!(cfg.json_response);
                assert_eq!(cfg.rpc_path, "/mcp");
            }
            #[allow(unreachable_patterns)]
            other => panic!("expected HTTP transport, got {:?}", other),
        }
        clear_env();
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_defaults() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        let config = HttpConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, DEFAULT_HTTP_PORT);
        assert!(!config.json_response);
        assert_eq!(TransportConfig::http_from_env().host, "0.0.0.0");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_description_mentions_mode() {
        let config = TransportConfig::Http(HttpConfig::default());
        assert_eq!(
            config.description(),
            "HTTP on 0.0.0.0:5000/mcp (SSE responses)"
        );
    }
}
