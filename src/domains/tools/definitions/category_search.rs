//! Walmart category browse tool.
//!
//! Lists top-level categories, or the children of `parent_id` when given.

use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::json;

use super::common::{
    ApiSettings, PreparedCall, clamp_limit, non_empty, parse_params, saturating_i64,
};
use crate::domains::tools::client::OutboundRequest;
use crate::domains::tools::credentials::Credential;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::schema::{OperationDescriptor, ParamType, ParameterSpec};

/// Upper bound for `limit`.
pub const MAX_LIMIT: i64 = 50;

/// Parameters for a category search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategorySearchParams {
    pub query: Option<String>,
    pub parent_id: Option<String>,
    #[serde(default = "default_limit", deserialize_with = "saturating_i64")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

/// Walmart category search tool implementation.
#[derive(Debug, Clone)]
pub struct CategorySearchTool;

impl CategorySearchTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "walmart_category_search";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search for Walmart product categories. Typical use: browse categories or find specific category information.";

    pub const LABEL: &'static str = "category search";

    pub fn descriptor() -> OperationDescriptor {
        OperationDescriptor {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            parameters: vec![
                ParameterSpec::optional("query", ParamType::String, "Optional. Category name to search for."),
                ParameterSpec::optional(
                    "parent_id",
                    ParamType::String,
                    "Optional. Parent category ID to get subcategories.",
                ),
                ParameterSpec::optional(
                    "limit",
                    ParamType::Integer,
                    "Number of categories to return (max 50, default 20).",
                )
                .with_default(json!(default_limit()))
                .with_maximum(MAX_LIMIT),
            ],
        }
    }

    /// Build the outbound request. A parent id selects the subcategory endpoint.
    pub fn build_request(
        params: &CategorySearchParams,
        credential: &Credential,
        settings: &ApiSettings,
    ) -> Result<OutboundRequest, ToolError> {
        let url = match non_empty(&params.parent_id) {
            Some(parent_id) => settings.endpoint(&["items", "categories", parent_id])?,
            None => settings.endpoint(&["items", "categories"])?,
        };
        let mut request = settings.request(url, credential);
        request
            .query
            .push(("limit", clamp_limit(params.limit, MAX_LIMIT).to_string()));
        if let Some(query) = non_empty(&params.query) {
            request.query.push(("query", query.to_string()));
        }
        Ok(request)
    }

    pub fn failure_message(_params: &CategorySearchParams) -> String {
        "Could not complete Walmart category search".to_string()
    }

    pub fn prepare(
        arguments: &JsonObject,
        credential: &Credential,
        settings: &ApiSettings,
    ) -> Result<PreparedCall, ToolError> {
        let params: CategorySearchParams = parse_params(arguments)?;
        Ok(PreparedCall {
            request: Self::build_request(&params, credential, settings)?,
            failure_message: Self::failure_message(&params),
            label: Self::LABEL,
        })
    }
}
