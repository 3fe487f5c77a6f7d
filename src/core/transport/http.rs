//! HTTP transport implementation.
//!
//! JSON-RPC over POST. Each request is answered either with a single JSON
//! body or with a one-event SSE stream, depending on
//! [`HttpConfig::json_response`]. The `x-auth-token` header carries the
//! caller's Walmart token for that request only.

use axum::{
    Json, Router,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::server::SERVER_INSTRUCTIONS;
use crate::domains::tools::{AUTH_TOKEN_HEADER, CredentialContext};

/// Protocol version answered when the client does not ask for one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-03-26";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Body could not be parsed as JSON-RPC.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::error(None, -32700, msg)
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    server: McpServer,
    /// Answer with plain JSON instead of SSE.
    json_response: bool,
    /// Where JSON-RPC is served, reported by `GET /`.
    rpc_path: String,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = router(&self.config, server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        let mode = if self.config.json_response {
            "JSON"
        } else {
            "SSE"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, {} responses, CORS {})",
            addr, mode, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the axum router for `server`.
pub fn router(config: &HttpConfig, server: McpServer) -> Router {
    let state = AppState {
        server,
        json_response: config.json_response,
        rpc_path: config.rpc_path.clone(),
    };

    let mut app = Router::new()
        .route(&config.rpc_path, post(handle_rpc))
        .route("/health", get(health_check))
        .route("/", get(root_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "responseMode": if state.json_response { "json" } else { "sse" },
        "endpoints": {
            "rpc": state.rpc_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "authentication": format!("{} header", AUTH_TOKEN_HEADER)
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<JsonRpcRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected JSON-RPC body: {}", rejection.body_text());
            return reply(&state, JsonRpcResponse::parse_error(rejection.body_text()));
        }
    };

    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    if request.method.starts_with("notifications/") {
        debug!("Received notification: {}", request.method);
        return StatusCode::ACCEPTED.into_response();
    }

    let credentials = credentials_from_headers(&headers);
    let response = process_request(&state, request, &credentials).await;
    reply(&state, response)
}

/// Per-request credentials from the `x-auth-token` header.
fn credentials_from_headers(headers: &HeaderMap) -> CredentialContext {
    let token = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    CredentialContext::from_optional(token)
}

/// Serialize the response in the configured mode.
fn reply(state: &AppState, response: JsonRpcResponse) -> Response {
    if state.json_response {
        return (StatusCode::OK, Json(response)).into_response();
    }

    let payload = match serde_json::to_string(&response) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Failed to encode JSON-RPC response: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response = Response::new(Body::from(Bytes::from(sse_event(&payload))));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

/// One SSE `message` event carrying `payload`.
fn sse_event(payload: &str) -> String {
    format!("event: message\ndata: {}\n\n", payload)
}

/// Process a JSON-RPC request and return the response.
async fn process_request(
    state: &AppState,
    request: JsonRpcRequest,
    credentials: &CredentialContext,
) -> JsonRpcResponse {
    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(state, request),
        "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
        "tools/list" => handle_tools_list(state, request),
        "tools/call" => handle_tools_call(state, request, credentials).await,
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Handle initialize request.
fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let protocol_version = request
        .params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_PROTOCOL_VERSION)
        .to_string();

    let result = serde_json::json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": SERVER_INSTRUCTIONS
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");

    let result = serde_json::json!({
        "tools": state.server.list_tools()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/call request.
async fn handle_tools_call(
    state: &AppState,
    request: JsonRpcRequest,
    credentials: &CredentialContext,
) -> JsonRpcResponse {
    info!("Processing tools/call request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing tool name"),
    };

    // `_meta.authToken` applies when the header is absent.
    let credentials = if credentials.has_token() {
        credentials.clone()
    } else {
        params
            .get("_meta")
            .and_then(|m| m.as_object())
            .map(CredentialContext::from_meta_object)
            .unwrap_or_default()
    };

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    let envelope = state.server.call_tool(&name, arguments, &credentials).await;
    match envelope.to_call_result_value() {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}
