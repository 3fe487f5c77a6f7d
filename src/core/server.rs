//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tools domain.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool
//! and registered in the static catalog (`domains/tools/catalog.rs`). Both
//! transports go through the same [`Dispatcher`]:
//! - STDIO: via the `ServerHandler` impl below
//! - HTTP: via [`McpServer::call_tool`]
//!
//! Discovery follows catalog order, and every call name (known or not) reaches
//! the dispatcher so that failures stay inside the result envelope.
//!
//! **Adding a new tool does NOT require modifying this file!**

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, JsonObject, ListToolsResult, Meta,
        PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use tracing::{info, instrument};

use super::config::Config;
use crate::domains::tools::{
    CatalogBackend, CredentialContext, CredentialResolver, Dispatcher, HttpCatalogBackend,
    ResultEnvelope, ToolError,
};

/// Instructions reported to clients on initialize.
pub const SERVER_INSTRUCTIONS: &str = "Search the Walmart catalog: products \
     (walmart_product_search), nearby stores (walmart_store_search) and the category \
     tree (walmart_category_search). Every call needs a Walmart API token, passed as \
     the x-auth-token header (HTTP) or _meta.authToken, unless the server has a default.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and forwards
/// every tool call to the shared [`Dispatcher`].
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Routes tool calls to the Walmart API.
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    /// Create a new MCP server talking to the real Walmart API.
    pub fn new(config: Config) -> super::error::Result<Self> {
        let backend = HttpCatalogBackend::new(config.backend.request_timeout())?;
        Self::with_backend(config, Arc::new(backend))
    }

    /// Create a server over any catalog backend.
    pub fn with_backend(
        config: Config,
        backend: Arc<dyn CatalogBackend>,
    ) -> super::error::Result<Self> {
        let settings = config.backend.api_settings()?;
        let resolver = CredentialResolver::new(config.credentials.walmart_api_key.clone());
        let dispatcher = Arc::new(Dispatcher::new(resolver, settings, backend));

        info!(
            "Serving {} tools against {}",
            dispatcher.catalog().list().len(),
            config.backend.base_url
        );

        Ok(Self {
            config: Arc::new(config),
            dispatcher,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Tool models in catalog order.
    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher.catalog().tools()
    }

    /// Run one `tools/call` coming from an rmcp session.
    ///
    /// Unknown names are answered with a failure envelope, not a protocol error.
    pub async fn handle_tool_call(&self, request: CallToolRequestParam, meta: &Meta) -> CallToolResult {
        let credentials = CredentialContext::from_meta(meta);
        let arguments = request.arguments.unwrap_or_default();
        self.dispatcher
            .invoke(&request.name, arguments, &credentials)
            .await
            .into_call_result()
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// `arguments` must be a JSON object or null.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
        credentials: &CredentialContext,
    ) -> ResultEnvelope {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => JsonObject::new(),
            other => {
                let kind = match other {
                    serde_json::Value::Array(_) => "an array",
                    serde_json::Value::String(_) => "a string",
                    serde_json::Value::Number(_) => "a number",
                    _ => "a boolean",
                };
                return ResultEnvelope::failure(
                    ToolError::invalid_arguments(format!("arguments must be an object, got {}", kind))
                        .to_string(),
                );
            }
        };
        self.dispatcher.invoke(name, arguments, credentials).await
    }
}

/// ServerHandler implementation; every tool request goes to the dispatcher.
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.handle_tool_call(request, &context.meta).await)
    }
}
