//! Tool dispatcher - validates, authenticates and routes one invocation.
//!
//! Every path out of [`Dispatcher::invoke`] is a [`ResultEnvelope`]; faults
//! never reach the transport as protocol errors.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::JsonObject;
use tracing::{error, info, instrument, warn};

use super::catalog::{Operation, OperationCatalog};
use super::client::CatalogBackend;
use super::credentials::{CredentialContext, CredentialResolver};
use super::definitions::ApiSettings;
use super::definitions::common::unexpected_message;
use super::envelope::ResultEnvelope;
use super::error::ToolError;

/// Routes tool calls to the catalog backend.
#[derive(Clone)]
pub struct Dispatcher {
    catalog: &'static OperationCatalog,
    resolver: CredentialResolver,
    settings: ApiSettings,
    backend: Arc<dyn CatalogBackend>,
}

impl Dispatcher {
    /// Create a dispatcher over the global catalog.
    pub fn new(
        resolver: CredentialResolver,
        settings: ApiSettings,
        backend: Arc<dyn CatalogBackend>,
    ) -> Self {
        Self {
            catalog: OperationCatalog::global(),
            resolver,
            settings,
            backend,
        }
    }

    /// The catalog this dispatcher serves.
    pub fn catalog(&self) -> &'static OperationCatalog {
        self.catalog
    }

    /// Invoke a tool by name.
    #[instrument(skip(self, arguments, credentials), fields(tool = %name))]
    pub async fn invoke(
        &self,
        name: &str,
        arguments: JsonObject,
        credentials: &CredentialContext,
    ) -> ResultEnvelope {
        info!("Calling tool: {}", name);

        let Some(operation) = self.catalog.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return ResultEnvelope::failure(ToolError::not_found(name).to_string());
        };

        if let Err(e) = operation.descriptor.validate_arguments(&arguments) {
            warn!("Rejected arguments for {}: {}", name, e);
            return ResultEnvelope::failure(e.to_string());
        }

        let outcome = AssertUnwindSafe(self.run(operation, &arguments, credentials))
            .catch_unwind()
            .await;

        match outcome {
            Ok(envelope) => envelope,
            Err(_) => {
                error!("Tool {} panicked", name);
                ResultEnvelope::failure(unexpected_message(operation.label))
            }
        }
    }

    async fn run(
        &self,
        operation: &Operation,
        arguments: &JsonObject,
        credentials: &CredentialContext,
    ) -> ResultEnvelope {
        let credential = match self.resolver.resolve(credentials) {
            Ok(credential) => credential,
            Err(e) => {
                error!("Could not get Walmart API token");
                return ResultEnvelope::failure(e.to_string());
            }
        };

        let call = match (operation.prepare)(arguments, &credential, &self.settings) {
            Ok(call) => call,
            Err(e @ ToolError::InvalidArguments(_)) => return ResultEnvelope::failure(e.to_string()),
            Err(e) => {
                error!("Failed to build request for {}: {}", operation.descriptor.name, e);
                return ResultEnvelope::failure(unexpected_message(operation.label));
            }
        };

        info!("Sending Walmart {} request", call.label);
        match self.backend.fetch(call.request.clone()).await {
            Ok(body) => {
                info!("Received Walmart {} response", call.label);
                ResultEnvelope::success(body)
            }
            Err(e) => {
                warn!("Walmart {} failed: {}", call.label, e);
                ResultEnvelope::failure(call.failure_message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::client::ACCESS_TOKEN_HEADER;
    use crate::domains::tools::client::testing::{StubBackend, StubReply};
    use serde_json::json;
    use std::time::Duration;

    const BODY: &str = r#"{"items": [{"itemId": 7, "name": "Kettle", "salePrice": 19.99}], "totalResults": 1}"#;

    fn dispatcher(backend: &StubBackend, fallback: Option<&str>) -> Dispatcher {
        Dispatcher::new(
            CredentialResolver::new(fallback.map(str::to_string)),
            ApiSettings::default(),
            Arc::new(backend.clone()),
        )
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn valid_args(tool: &str) -> JsonObject {
        match tool {
            "walmart_product_search" => args(json!({"query": "kettle"})),
            "walmart_store_search" => args(json!({"location": "72712"})),
            _ => args(json!({})),
        }
    }

    const TOOLS: [&str; 3] = [
        "walmart_product_search",
        "walmart_store_search",
        "walmart_category_search",
    ];

    #[tokio::test]
    async fn test_unknown_tool() {
        let backend = StubBackend::new(StubReply::Body(BODY));
        let envelope = dispatcher(&backend, Some("env"))
            .invoke("walmart_checkout", JsonObject::new(), &CredentialContext::empty())
            .await;
        assert_eq!(envelope.error(), Some("Unknown tool: walmart_checkout"));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_for_every_tool() {
        let backend = StubBackend::new(StubReply::Body(BODY));
        let dispatcher = dispatcher(&backend, None);
        for tool in TOOLS {
            let envelope = dispatcher
                .invoke(tool, valid_args(tool), &CredentialContext::empty())
                .await;
            assert_eq!(envelope.error(), Some("Missing Walmart API token"), "{}", tool);
        }
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_success_passthrough() {
        let backend = StubBackend::new(StubReply::Body(BODY));
        let envelope = dispatcher(&backend, Some("env"))
            .invoke(
                "walmart_product_search",
                valid_args("walmart_product_search"),
                &CredentialContext::empty(),
            )
            .await;
        assert_eq!(envelope.to_json_string(), BODY);
        assert_eq!(backend.last_request().header(ACCESS_TOKEN_HEADER), Some("env"));
    }

    #[tokio::test]
    async fn test_non_2xx_messages() {
        let backend = StubBackend::new(StubReply::Status(500));
        let dispatcher = dispatcher(&backend, Some("env"));

        let envelope = dispatcher
            .invoke(
                "walmart_product_search",
                args(json!({"query": "kettle"})),
                &CredentialContext::empty(),
            )
            .await;
        assert_eq!(
            envelope.error(),
            Some("Could not complete Walmart product search for query: kettle")
        );

        let envelope = dispatcher
            .invoke(
                "walmart_store_search",
                args(json!({"location": "Austin, TX"})),
                &CredentialContext::empty(),
            )
            .await;
        assert_eq!(
            envelope.error(),
            Some("Could not complete Walmart store search for location: Austin, TX")
        );

        let envelope = dispatcher
            .invoke("walmart_category_search", JsonObject::new(), &CredentialContext::empty())
            .await;
        assert_eq!(envelope.error(), Some("Could not complete Walmart category search"));
        assert_eq!(backend.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_clamping_through_dispatch() {
        let backend = StubBackend::new(StubReply::Body(BODY));
        let dispatcher = dispatcher(&backend, Some("env"));

        dispatcher
            .invoke(
                "walmart_product_search",
                args(json!({"query": "tv", "limit": 999})),
                &CredentialContext::empty(),
            )
            .await;
        assert_eq!(backend.last_request().query_param("limit"), Some("50"));

        dispatcher
            .invoke(
                "walmart_store_search",
                args(json!({"location": "72712", "limit": 999})),
                &CredentialContext::empty(),
            )
            .await;
        assert_eq!(backend.last_request().query_param("limit"), Some("20"));
    }

    #[tokio::test]
    async fn test_out_of_range_limit_is_clamped() {
        let backend = StubBackend::new(StubReply::Body(BODY));
        let dispatcher = dispatcher(&backend, Some("env"));

        for (tool, extra, expected) in [
            ("walmart_product_search", json!({"query": "tv"}), "50"),
            ("walmart_store_search", json!({"location": "72712"}), "20"),
            ("walmart_category_search", json!({}), "50"),
        ] {
            let mut arguments = args(extra);
            arguments.insert("limit".to_string(), json!(u64::MAX));
            let envelope = dispatcher
                .invoke(tool, arguments, &CredentialContext::empty())
                .await;
            assert_eq!(envelope.error(), None, "{}", tool);
            assert_eq!(backend.last_request().query_param("limit"), Some(expected), "{}", tool);
        }
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let backend = StubBackend::new(StubReply::Body(BODY));
        let envelope = dispatcher(&backend, Some("env"))
            .invoke("walmart_product_search", JsonObject::new(), &CredentialContext::empty())
            .await;
        assert_eq!(
            envelope.error(),
            Some("Invalid arguments: missing required parameter 'query'")
        );
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_panic_becomes_generic_error() {
        let backend = StubBackend::new(StubReply::Panic);
        let envelope = dispatcher(&backend, Some("env"))
            .invoke(
                "walmart_store_search",
                valid_args("walmart_store_search"),
                &CredentialContext::empty(),
            )
            .await;
        assert_eq!(envelope.error(), Some("Unexpected error in Walmart store search"));
    }

    #[tokio::test]
    async fn test_concurrent_calls_keep_their_own_token() {
        let backend =
            StubBackend::new(StubReply::Body(BODY)).with_delay(Duration::from_millis(20));
        let dispatcher = dispatcher(&backend, Some("env"));

        let calls = (0..8).map(|i| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let context = CredentialContext::with_token(format!("caller-{i}"));
                dispatcher
                    .invoke(
                        "walmart_product_search",
                        args(json!({"query": format!("item-{i}")})),
                        &context,
                    )
                    .await
            })
        });
        for result in futures::future::join_all(calls).await {
            assert_eq!(result.unwrap().error(), None);
        }

        let requests = backend.requests();
        assert_eq!(requests.len(), 8);
        for request in requests {
            let query = request.query_param("query").unwrap();
            let index = query.strip_prefix("item-").unwrap();
            assert_eq!(
                request.header(ACCESS_TOKEN_HEADER),
                Some(format!("caller-{index}").as_str())
            );
        }
    }
}
