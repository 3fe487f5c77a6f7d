//! Outbound Walmart API client.
//!
//! Request builders produce an [`OutboundRequest`]; a [`CatalogBackend`]
//! performs it. The production backend is a reqwest client with a bounded
//! timeout. It never retries.

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use serde_json::value::RawValue;
use tracing::{debug, instrument};

use super::error::BackendError;

/// Header carrying the access token.
pub const ACCESS_TOKEN_HEADER: &str = "WM_SEC.ACCESS_TOKEN";

/// Header carrying the fixed correlation id.
pub const CORRELATION_ID_HEADER: &str = "WM_QOS.CORRELATION_ID";

/// A single GET request against the catalog API.
#[derive(Clone)]
pub struct OutboundRequest {
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub query: Vec<(&'static str, String)>,
}

impl OutboundRequest {
    /// Target URL with the query string attached.
    pub fn full_url(&self) -> Result<Url, BackendError> {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            let encoded = serde_urlencoded::to_string(&self.query)
                .map_err(|e| BackendError::Transport(format!("query encoding failed: {e}")))?;
            url.set_query(Some(&encoded));
        }
        Ok(url)
    }
}

impl fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(key, value)| {
                if key.eq_ignore_ascii_case(ACCESS_TOKEN_HEADER) {
                    (*key, "[REDACTED]")
                } else {
                    (*key, value.as_str())
                }
            })
            .collect();
        f.debug_struct("OutboundRequest")
            .field("url", &self.url.as_str())
            .field("headers", &headers)
            .field("query", &self.query)
            .finish()
    }
}

/// Something that can execute an [`OutboundRequest`].
#[async_trait::async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Perform the request and return the JSON body verbatim.
    async fn fetch(&self, request: OutboundRequest) -> Result<Box<RawValue>, BackendError>;
}

/// reqwest-backed [`CatalogBackend`].
#[derive(Debug, Clone)]
pub struct HttpCatalogBackend {
    client: reqwest::Client,
}

impl HttpCatalogBackend {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("walmart-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl CatalogBackend for HttpCatalogBackend {
    #[instrument(skip_all, fields(path = %request.url.path()))]
    async fn fetch(&self, request: OutboundRequest) -> Result<Box<RawValue>, BackendError> {
        let url = request.full_url()?;
        debug!("GET {:?}", request);

        let mut builder = self.client.get(url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("API response received: {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        RawValue::from_string(body).map_err(|e| BackendError::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
impl OutboundRequest {
    /// Value of a header, if set.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Value of a query parameter, if set.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OutboundRequest {
        OutboundRequest {
            url: Url::parse("https://api.walmart.com/v3/items/search").unwrap(),
            headers: vec![
                ("Accept", "application/json".to_string()),
                (ACCESS_TOKEN_HEADER, "secret-token-value".to_string()),
            ],
            query: vec![("query", "usb c cable".to_string()), ("limit", "10".to_string())],
        }
    }

    #[test]
    fn test_full_url_encodes_query() {
        let url = request().full_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.walmart.com/v3/items/search?query=usb+c+cable&limit=10"
        );
    }

    #[test]
    fn test_lookup_helpers() {
        let req = request();
        assert_eq!(req.header("wm_sec.access_token"), Some("secret-token-value"));
        assert_eq!(req.query_param("limit"), Some("10"));
        assert_eq!(req.query_param("offset"), None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", request());
        assert!(!debug.contains("secret-token-value"));
        assert!(debug.contains("REDACTED"));
        assert!(debug.contains("usb c cable"));
    }

    #[cfg(feature = "http")]
    mod http_stub {
        use super::*;
        use axum::{Router, http::HeaderMap, http::StatusCode, routing::get};
        use tokio::net::TcpListener;

        const BODY: &str = r#"{"items":[{"itemId":42,"name":"Cable"}],"totalResults":1}"#;

        async fn spawn_stub() -> String {
            let app = Router::new()
                .route(
                    "/v3/items/search",
                    get(|headers: HeaderMap| async move {
                        match headers.get("wm_sec.access_token") {
                            Some(token) if token == "good" => (StatusCode::OK, BODY),
                            _ => (StatusCode::UNAUTHORIZED, "{\"errors\":[]}"),
                        }
                    }),
                )
                .route("/v3/stores", get(|| async { (StatusCode::OK, "not json") }))
                .route(
                    "/v3/slow",
                    get(|| async {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        "{}"
                    }),
                );
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{}/v3", addr)
        }

        fn stub_request(base: &str, path: &str, token: &str) -> OutboundRequest {
            OutboundRequest {
                url: Url::parse(&format!("{}/{}", base, path)).unwrap(),
                headers: vec![(ACCESS_TOKEN_HEADER, token.to_string())],
                query: vec![("query", "cable".to_string())],
            }
        }

        #[tokio::test]
        async fn test_fetch_returns_body_verbatim() {
            let base = spawn_stub().await;
            let backend = HttpCatalogBackend::new(Duration::from_secs(5)).unwrap();
            let body = backend
                .fetch(stub_request(&base, "items/search", "good"))
                .await
                .unwrap();
            assert_eq!(body.get(), BODY);
        }

        #[tokio::test]
        async fn test_fetch_non_2xx_is_status_error() {
            let base = spawn_stub().await;
            let backend = HttpCatalogBackend::new(Duration::from_secs(5)).unwrap();
            let err = backend
                .fetch(stub_request(&base, "items/search", "bad"))
                .await
                .unwrap_err();
            assert!(matches!(err, BackendError::Status { status: 401, .. }));
        }

        #[tokio::test]
        async fn test_fetch_non_json_body() {
            let base = spawn_stub().await;
            let backend = HttpCatalogBackend::new(Duration::from_secs(5)).unwrap();
            let result = backend.fetch(stub_request(&base, "stores", "good")).await;
            tokio_test::assert_err!(&result);
            assert!(matches!(result, Err(BackendError::InvalidBody(_))));
        }

        #[tokio::test]
        async fn test_fetch_times_out() {
            let base = spawn_stub().await;
            let backend = HttpCatalogBackend::new(Duration::from_millis(200)).unwrap();
            let err = backend
                .fetch(stub_request(&base, "slow", "good"))
                .await
                .unwrap_err();
            assert!(matches!(err, BackendError::Transport(_)));
        }
    }
}
