//! Configuration management for the MCP server.
//!
//! Defaults, then `.env`, then environment variables. Command-line flags are
//! layered on top in [`super::cli`]. Everything is read once at startup.

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::domains::tools::definitions::ApiSettings;
use crate::domains::tools::definitions::common::{DEFAULT_BASE_URL, DEFAULT_CORRELATION_ID};

/// Default timeout for every outbound catalog request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Walmart API credentials.
    pub credentials: CredentialsConfig,

    /// Outbound Walmart API settings.
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
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Process-wide fallback token, used when a call carries none.
    pub walmart_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "walmart_api_key",
                &self.walmart_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Outbound Walmart API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// API root, e.g. `https://api.walmart.com/v3`.
    pub base_url: String,

    /// Value of the `WM_QOS.CORRELATION_ID` header.
    pub correlation_id: String,

    /// Upper bound for each outbound request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            correlation_id: DEFAULT_CORRELATION_ID.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    /// Parsed builder settings.
    pub fn api_settings(&self) -> Result<ApiSettings> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("invalid API base URL '{}': {}", self.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "API base URL '{}' cannot hold a path",
                self.base_url
            )));
        }
        Ok(ApiSettings::new(base_url, self.correlation_id.clone()))
    }

    /// Request timeout as a Duration. Zero falls back to the default.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "walmart-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            backend: BackendConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, ...); Walmart settings use `WALMART_`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        match std::env::var("WALMART_API_KEY") {
            Ok(key) if !key.trim().is_empty() => {
                config.credentials.walmart_api_key = Some(key);
                info!("Walmart API key loaded from environment");
            }
            _ => warn!(
                "WALMART_API_KEY not set - every call must carry its own token \
                 (x-auth-token header or _meta.authToken)"
            ),
        }

        if let Ok(base_url) = std::env::var("WALMART_API_BASE_URL") {
            config.backend.base_url = base_url;
        }

        if let Ok(correlation_id) = std::env::var("WALMART_CORRELATION_ID") {
            config.backend.correlation_id = correlation_id;
        }

        if let Ok(timeout) = std::env::var("WALMART_REQUEST_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.backend.request_timeout_secs = secs,
                Err(_) => warn!(
                    "Ignoring invalid WALMART_REQUEST_TIMEOUT_SECS '{}', using {}s",
                    timeout, DEFAULT_REQUEST_TIMEOUT_SECS
                ),
            }
        }

        config
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    pub(crate) static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_credentials_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("WALMART_API_KEY", "test_key_12345");
        }
        let config = Config::from_env();
        assert_eq!(
            config.credentials.walmart_api_key.as_deref(),
            Some("test_key_12345")
        );
        unsafe {
            std::env::remove_var("WALMART_API_KEY");
        }
    }

    #[test]
    fn test_blank_key_is_ignored() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("WALMART_API_KEY", "  ");
        }
        let config = Config::from_env();
        assert!(config.credentials.walmart_api_key.is_none());
        unsafe {
            std::env::remove_var("WALMART_API_KEY");
        }
    }

    #[test]
    fn test_backend_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("WALMART_API_BASE_URL", "http://127.0.0.1:9999/v3");
            std::env::set_var("WALMART_REQUEST_TIMEOUT_SECS", "5");
        }
        let config = Config::from_env();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:9999/v3");
        assert_eq!(config.backend.request_timeout(), Duration::from_secs(5));
        unsafe {
            std::env::remove_var("WALMART_API_BASE_URL");
            std::env::remove_var("WALMART_REQUEST_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            walmart_api_key: Some("super_secret_key".to_string()),
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[test]
    fn test_api_settings() {
        let settings = BackendConfig::default().api_settings().unwrap();
        assert_eq!(settings.base_url.as_str(), "https://api.walmart.com/v3");
        assert_eq!(settings.correlation_id, "walmart-mcp-server");

        let bad = BackendConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(bad.api_settings(), Err(Error::Config(_))));

        let opaque = BackendConfig {
            base_url: "mailto:ops@example.com".to_string(),
            ..Default::default()
        };
        assert!(opaque.api_settings().is_err());
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let backend = BackendConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(
            backend.request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }
}
