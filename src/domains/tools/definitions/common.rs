//! Helpers shared by the Walmart operation builders.

use reqwest::Url;
use rmcp::model::JsonObject;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Number, Value};

use crate::domains::tools::client::{ACCESS_TOKEN_HEADER, CORRELATION_ID_HEADER, OutboundRequest};
use crate::domains::tools::credentials::Credential;
use crate::domains::tools::error::ToolError;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.walmart.com/v3";

/// Default value of the correlation-id header.
pub const DEFAULT_CORRELATION_ID: &str = "walmart-mcp-server";

/// Static settings every builder needs.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub correlation_id: String,
}

impl ApiSettings {
    pub fn new(base_url: Url, correlation_id: impl Into<String>) -> Self {
        Self {
            base_url,
            correlation_id: correlation_id.into(),
        }
    }

    /// Resolve an endpoint below the API root. Each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ToolError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ToolError::internal(format!("base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start an outbound request with the standard headers.
    pub fn request(&self, url: Url, credential: &Credential) -> OutboundRequest {
        OutboundRequest {
            url,
            headers: vec![
                ("Accept", "application/json".to_string()),
                (ACCESS_TOKEN_HEADER, credential.as_str().to_string()),
                (CORRELATION_ID_HEADER, self.correlation_id.clone()),
            ],
            query: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Default for ApiSettings {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_BASE_URL).unwrap(), DEFAULT_CORRELATION_ID)
    }
}

/// Output of a builder: the request plus how to describe its failures.
#[derive(Debug, Clone)]
pub struct PreparedCall {
    pub request: OutboundRequest,
    /// Message returned when the backend call fails.
    pub failure_message: String,
    /// Human label, e.g. "product search".
    pub label: &'static str,
}

/// Generic unexpected-error message for an operation label.
pub fn unexpected_message(label: &str) -> String {
    format!("Unexpected error in Walmart {}", label)
}

/// Deserialize validated arguments into a typed params struct.
///
/// `null` entries are dropped first so serde defaults apply.
pub fn parse_params<T: DeserializeOwned>(arguments: &JsonObject) -> Result<T, ToolError> {
    let cleaned: JsonObject = arguments
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    serde_json::from_value(Value::Object(cleaned))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Read an integer argument, saturating values beyond the `i64` range.
///
/// Validation already admits any JSON integer, so a huge `limit` must still
/// land on the clamp instead of failing here.
pub fn saturating_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        Ok(value)
    } else if number.is_u64() {
        Ok(i64::MAX)
    } else {
        Err(de::Error::custom(format!("expected an integer, got {}", number)))
    }
}

/// Clamp a requested count into `1..=max`.
pub fn clamp_limit(limit: i64, max: i64) -> i64 {
    limit.clamp(1, max)
}

/// Treat empty strings as absent.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Counted {
        #[serde(deserialize_with = "saturating_i64")]
        count: i64,
    }

    #[test]
    fn test_saturating_i64() {
        let parse = |v: Value| serde_json::from_value::<Counted>(v).map(|c| c.count);
        assert_eq!(parse(json!({"count": 7})).unwrap(), 7);
        assert_eq!(parse(json!({"count": -7})).unwrap(), -7);
        assert_eq!(parse(json!({"count": u64::MAX})).unwrap(), i64::MAX);
        assert!(parse(json!({"count": 1.5})).is_err());
        assert!(parse(json!({"count": "7"})).is_err());
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(10, 50), 10);
        assert_eq!(clamp_limit(999, 50), 50);
        assert_eq!(clamp_limit(0, 20), 1);
        assert_eq!(clamp_limit(-3, 20), 1);
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let settings = ApiSettings::default();
        assert_eq!(
            settings.endpoint(&["items", "search"]).unwrap().as_str(),
            "https://api.walmart.com/v3/items/search"
        );

        let trailing = ApiSettings::new(Url::parse("http://localhost:9000/v3/").unwrap(), "x");
        assert_eq!(
            trailing.endpoint(&["stores"]).unwrap().as_str(),
            "http://localhost:9000/v3/stores"
        );
    }

    #[test]
    fn test_endpoint_encodes_segment() {
        let url = ApiSettings::default()
            .endpoint(&["items", "categories", "a/b c"])
            .unwrap();
        assert_eq!(url.path(), "/v3/items/categories/a%2Fb%20c");
    }

    #[test]
    fn test_standard_headers() {
        let url = Url::parse(DEFAULT_BASE_URL).unwrap();
        let request = ApiSettings::default().request(url, &Credential::new("tok"));
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.header(ACCESS_TOKEN_HEADER), Some("tok"));
        assert_eq!(request.header(CORRELATION_ID_HEADER), Some(DEFAULT_CORRELATION_ID));
    }

    #[test]
    fn test_parse_params_drops_nulls() {
        #[derive(Deserialize)]
        struct P {
            #[serde(default = "ten")]
            limit: i64,
        }
        fn ten() -> i64 {
            10
        }
        let args = serde_json::json!({ "limit": null });
        let params: P = parse_params(args.as_object().unwrap()).unwrap();
        assert_eq!(params.limit, 10);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&Some("x".to_string())), Some("x"));
        assert_eq!(non_empty(&None), None);
    }
}
