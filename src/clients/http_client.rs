//! HTTP client for Admin API communication.
//!
//! [`HttpClient`] owns the `reqwest` client, the base URI and the default
//! headers (access token, user agent). It sends exactly one request per call:
//! there is no retry loop and no backoff.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_response::HttpResponse;
use crate::config::TasksConfig;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying the Admin API access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// HTTP client for making requests to the Admin API.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_admin_tasks::clients::HttpClient;
///
/// let client = HttpClient::new("/admin/api/2025-01", &config)?;
/// let response = client.post_json("graphql.json", r#"{"query":"{ shop { name } }"}"#.into()).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    /// Base URI (e.g., `https://my-store.myshopify.com`).
    base_uri: String,
    /// Base path (e.g., "/admin/api/2025-01").
    base_path: String,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying TLS client cannot be
    /// initialized.
    pub fn new(base_path: impl Into<String>, config: &TasksConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Shopify Admin Tasks v{SDK_VERSION} | Rust");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            ACCESS_TOKEN_HEADER.to_string(),
            config.access_token().as_ref().to_string(),
        );

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            base_uri: config.store_url().as_ref().to_string(),
            base_path: base_path.into(),
            default_headers,
        })
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the base path for this client.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the full URL for a path relative to the base path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_uri, self.base_path, path)
    }

    /// POSTs a JSON body and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the request cannot be sent or the body
    /// cannot be read, and [`HttpError::Response`] (with the raw body) for any
    /// non-2xx status.
    pub async fn post_json(&self, path: &str, body: String) -> Result<HttpResponse, HttpError> {
        let url = self.url_for(path);

        let mut req_builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        tracing::debug!(%url, "sending Admin API request");
        let res = req_builder.body(body).send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        let response = HttpResponse::new(code, res_headers, body_text);

        if let Some(reason) = response.deprecation_reason() {
            tracing::warn!(
                "Deprecated request to Shopify API at {}, received reason: {}",
                path,
                reason
            );
        }

        if let Some(limit) = response.api_call_limit {
            tracing::debug!(
                request_count = limit.request_count,
                bucket_size = limit.bucket_size,
                "API call limit"
            );
        }

        if !response.is_ok() {
            return Err(HttpError::Response(HttpResponseError {
                code,
                error_reference: response.request_id().map(String::from),
                message: response.body,
            }));
        }

        Ok(response)
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
