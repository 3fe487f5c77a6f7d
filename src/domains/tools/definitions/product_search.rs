//! Walmart product search tool.
//!
//! Searches the item catalog by free-text query with optional price,
//! availability and category filters.

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

/// Accepted values for `sort`.
pub const SORT_OPTIONS: &[&str] = &["relevance", "price_low", "price_high", "rating", "newest"];

/// Sort order for product results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceLow => "price_low",
            Self::PriceHigh => "price_high",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }
}

/// Parameters for a product search.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSearchParams {
    pub query: String,
    #[serde(default = "default_limit", deserialize_with = "saturating_i64")]
    pub limit: i64,
    #[serde(default, deserialize_with = "saturating_i64")]
    pub offset: i64,
    #[serde(default)]
    pub sort: SortOrder,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock: Option<bool>,
    pub category_id: Option<String>,
}

fn default_limit() -> i64 {
    10
}

/// Walmart product search tool implementation.
#[derive(Debug, Clone)]
pub struct ProductSearchTool;

impl ProductSearchTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "walmart_product_search";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search for Walmart products. Typical use: search for products by query, with optional filters for price, category, availability, and sorting.";

    /// Label used in failure messages.
    pub const LABEL: &'static str = "product search";

    /// Operation metadata.
    pub fn descriptor() -> OperationDescriptor {
        OperationDescriptor {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            parameters: vec![
                ParameterSpec::required("query", ParamType::String, "Required. The product search query."),
                ParameterSpec::optional(
                    "limit",
                    ParamType::Integer,
                    "Number of results to return (max 50, default 10).",
                )
                .with_default(json!(default_limit()))
                .with_maximum(MAX_LIMIT),
                ParameterSpec::optional("offset", ParamType::Integer, "Zero-based offset for pagination.")
                    .with_default(json!(0)),
                ParameterSpec::enumerated("sort", SORT_OPTIONS, "Sort order for results.")
                    .with_default(json!(SortOrder::default().as_str())),
                ParameterSpec::optional("min_price", ParamType::Number, "Minimum price filter."),
                ParameterSpec::optional("max_price", ParamType::Number, "Maximum price filter."),
                ParameterSpec::optional("in_stock", ParamType::Boolean, "Filter for in-stock items only."),
                ParameterSpec::optional("category_id", ParamType::String, "Filter by specific category ID."),
            ],
        }
    }

    /// Build the outbound request.
    pub fn build_request(
        params: &ProductSearchParams,
        credential: &Credential,
        settings: &ApiSettings,
    ) -> Result<OutboundRequest, ToolError> {
        let url = settings.endpoint(&["items", "search"])?;
        let mut request = settings.request(url, credential);

        request.query.push(("query", params.query.clone()));
        request
            .query
            .push(("limit", clamp_limit(params.limit, MAX_LIMIT).to_string()));
        request.query.push(("offset", params.offset.max(0).to_string()));

        if params.sort != SortOrder::Relevance {
            request.query.push(("sort", params.sort.as_str().to_string()));
        }
        if let Some(min_price) = params.min_price {
            request.query.push(("minPrice", min_price.to_string()));
        }
        if let Some(max_price) = params.max_price {
            request.query.push(("maxPrice", max_price.to_string()));
        }
        if let Some(in_stock) = params.in_stock {
            request.query.push(("inStock", in_stock.to_string()));
        }
        if let Some(category_id) = non_empty(&params.category_id) {
            request.query.push(("categoryId", category_id.to_string()));
        }

        Ok(request)
    }

    /// Message returned when the backend call fails.
    pub fn failure_message(params: &ProductSearchParams) -> String {
        format!(
            "Could not complete Walmart product search for query: {}",
            params.query
        )
    }

    /// Parse arguments and build the call.
    pub fn prepare(
        arguments: &JsonObject,
        credential: &Credential,
        settings: &ApiSettings,
    ) -> Result<PreparedCall, ToolError> {
        let params: ProductSearchParams = parse_params(arguments)?;
        Ok(PreparedCall {
            request: Self::build_request(&params, credential, settings)?,
            failure_message: Self::failure_message(&params),
            label: Self::LABEL,
        })
    }
}
