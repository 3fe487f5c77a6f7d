//! Tools domain module.
//!
//! This module handles the Walmart catalog tools exposed over MCP.
//!
//! ## Architecture
//!
//! - `definitions/` - One file per Walmart operation (params, descriptor, request builder)
//! - `schema.rs` - Parameter specs and JSON input schemas
//! - `catalog.rs` - Static operation catalog (name -> descriptor + builder)
//! - `credentials.rs` - Per-call access token resolution
//! - `client.rs` - Outbound request model and the reqwest backend
//! - `dispatcher.rs` - Validates, authenticates and routes one invocation
//! - `envelope.rs` - The `{...}` / `{"error": ...}` result shape
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with `descriptor()` and `prepare()`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in `catalog.rs`
//!
//! Both transports pick it up from the catalog.

pub mod catalog;
pub mod client;
pub mod credentials;
pub mod definitions;
mod dispatcher;
mod envelope;
mod error;
pub mod schema;

pub use catalog::{Operation, OperationCatalog};
pub use client::{CatalogBackend, HttpCatalogBackend, OutboundRequest};
pub use credentials::{AUTH_TOKEN_HEADER, Credential, CredentialContext, CredentialResolver};
pub use dispatcher::Dispatcher;
pub use envelope::ResultEnvelope;
pub use error::{BackendError, MISSING_TOKEN_MESSAGE, ToolError};
