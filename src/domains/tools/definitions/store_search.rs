//! Walmart store locator tool.

use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::json;

use super::common::{ApiSettings, PreparedCall, clamp_limit, parse_params, saturating_i64};
use crate::domains::tools::client::OutboundRequest;
use crate::domains::tools::credentials::Credential;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::schema::{OperationDescriptor, ParamType, ParameterSpec};

/// Upper bound for `limit`.
pub const MAX_LIMIT: i64 = 20;

/// Parameters for a store search.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSearchParams {
    pub location: String,
    #[serde(default = "default_radius", deserialize_with = "saturating_i64")]
    pub radius: i64,
    #[serde(default = "default_limit", deserialize_with = "saturating_i64")]
    pub limit: i64,
}

fn default_radius() -> i64 {
    25
}

fn default_limit() -> i64 {
    10
}

/// Walmart store search tool implementation.
#[derive(Debug, Clone)]
pub struct StoreSearchTool;

impl StoreSearchTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "walmart_store_search";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search for Walmart stores near a location. Typical use: find Walmart stores by zip code, city, or coordinates.";

    pub const LABEL: &'static str = "store search";

    pub fn descriptor() -> OperationDescriptor {
        OperationDescriptor {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            parameters: vec![
                ParameterSpec::required(
                    "location",
                    ParamType::String,
                    "Required. Location to search (zip code, city, or coordinates).",
                ),
                ParameterSpec::optional("radius", ParamType::Integer, "Search radius in miles (default 25).")
                    .with_default(json!(default_radius())),
                ParameterSpec::optional(
                    "limit",
                    ParamType::Integer,
                    "Number of stores to return (max 20, default 10).",
                )
                .with_default(json!(default_limit()))
                .with_maximum(MAX_LIMIT),
            ],
        }
    }

    pub fn build_request(
        params: &StoreSearchParams,
        credential: &Credential,
        settings: &ApiSettings,
    ) -> Result<OutboundRequest, ToolError> {
        let url = settings.endpoint(&["stores"])?;
        let mut request = settings.request(url, credential);
        request.query.push(("location", params.location.clone()));
        request.query.push(("radius", params.radius.to_string()));
        request
            .query
            .push(("limit", clamp_limit(params.limit, MAX_LIMIT).to_string()));
        Ok(request)
    }

    pub fn failure_message(params: &StoreSearchParams) -> String {
        format!(
            "Could not complete Walmart store search for location: {}",
            params.location
        )
    }

    pub fn prepare(
        arguments: &JsonObject,
        credential: &Credential,
        settings: &ApiSettings,
    ) -> Result<PreparedCall, ToolError> {
        let params: StoreSearchParams = parse_params(arguments)?;
        Ok(PreparedCall {
            request: Self::build_request(&params, credential, settings)?,
            failure_message: Self::failure_message(&params),
            label: Self::LABEL,
        })
    }
}
