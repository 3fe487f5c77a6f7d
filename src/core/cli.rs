//! Command-line flags.
//!
//! Flags override whatever [`Config::from_env`](super::Config::from_env)
//! produced; anything left unset keeps its environment value.

use clap::{Parser, ValueEnum};

use super::config::Config;
use super::error::Result;
use super::transport::TransportConfig;

/// Walmart catalog MCP server.
#[derive(Parser, Debug)]
#[command(name = "walmart-mcp-server", version, about)]
pub struct Cli {
    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Transport to serve on.
    #[arg(long, value_enum)]
    pub transport: Option<TransportKind>,

    /// HTTP port. Implies `--transport http` when no transport is given.
    #[arg(long)]
    pub port: Option<u16>,

    /// HTTP bind address.
    #[arg(long)]
    pub host: Option<String>,

    /// Answer HTTP calls with a single JSON body instead of SSE.
    #[arg(long)]
    pub json_response: bool,
}

/// Transport selectable on the command line.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportKind {
    /// Newline-delimited JSON-RPC on stdin/stdout.
    Stdio,
    /// JSON-RPC over HTTP POST.
    Http,
}

impl Cli {
    /// Layer the flags on top of `config`.
    pub fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }

        let wants_http = self.port.is_some() || self.host.is_some() || self.json_response;
        let kind = match self.transport {
            Some(kind) => Some(kind),
            None if wants_http => Some(TransportKind::Http),
            None => None,
        };

        match kind {
            None => {}
            Some(TransportKind::Stdio) => config.transport = stdio_transport()?,
            Some(TransportKind::Http) => {
                config.transport = http_transport(
                    &config.transport,
                    self.port,
                    self.host,
                    self.json_response,
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(feature = "stdio")]
fn stdio_transport() -> Result<TransportConfig> {
    Ok(TransportConfig::stdio())
}

#[cfg(not(feature = "stdio"))]
fn stdio_transport() -> Result<TransportConfig> {
    Err(super::error::Error::config("this build has no stdio transport"))
}

#[cfg(feature = "http")]
fn http_transport(
    current: &TransportConfig,
    port: Option<u16>,
    host: Option<String>,
    json_response: bool,
) -> Result<TransportConfig> {
    #[allow(unreachable_patterns)]
    let mut http = match current {
        TransportConfig::Http(cfg) => cfg.clone(),
        _ => TransportConfig::http_from_env(),
    };
    if let Some(port) = port {
        http.port = port;
    }
    if let Some(host) = host {
        http.host = host;
    }
    http.json_response |= json_response;
    Ok(TransportConfig::Http(http))
}

#[cfg(not(feature = "http"))]
fn http_transport(
    _current: &TransportConfig,
    _port: Option<u16>,
    _host: Option<String>,
    _json_response: bool,
) -> Result<TransportConfig> {
    Err(super::error::Error::config("this build has no http transport"))
}
