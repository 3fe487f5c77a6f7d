//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default mode. Protocol
//! frames go to stdout, so all logging must stay on stderr.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until the client closes stdin.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!(
            "{} v{} ready - communicating via stdin/stdout",
            server.name(),
            server.version()
        );

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("STDIO transport finished");
        Ok(())
    }
}
