//! HTTP response type for Admin API calls.
//!
//! [`HttpResponse`] keeps the status, the lower-cased headers and the raw body
//! text. Decoding the body is left to the GraphQL layer so that a malformed
//! body surfaces as a decode error rather than being silently replaced.

use std::collections::HashMap;

/// Rate limit information parsed from the `X-Shopify-Shop-Api-Call-Limit` header.
///
/// The header format is "X/Y" where X is the current request count and Y is
/// the bucket size.
///
/// # Example
///
/// ```rust
/// use shopify_admin_tasks::clients::ApiCallLimit;
///
/// let limit = ApiCallLimit::parse("40/80").unwrap();
/// assert_eq!(limit.request_count, 40);
/// assert_eq!(limit.bucket_size, 80);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiCallLimit {
    /// Number of requests made in the current window.
    pub request_count: u32,
    /// Maximum requests allowed in the bucket.
    pub bucket_size: u32,
}

impl ApiCallLimit {
    /// Parses the header value, returning `None` if it is malformed.
    #[must_use]
    pub fn parse(header_value: &str) -> Option<Self> {
        let (count, size) = header_value.split_once('/')?;
        Some(Self {
            request_count: count.trim().parse().ok()?,
            bucket_size: size.trim().parse().ok()?,
        })
    }
}

/// An HTTP response from the Admin API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers keyed by lower-cased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
    /// Rate limit information, when the header is present.
    pub api_call_limit: Option<ApiCallLimit>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the call-limit header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        let api_call_limit = headers
            .get("x-shopify-shop-api-call-limit")
            .and_then(|values| values.first())
            .and_then(|value| ApiCallLimit::parse(value));

        Self {
            code,
            headers,
            body,
            api_call_limit,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `X-Shopify-API-Deprecated-Reason` header value, if present.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-shopify-api-deprecated-reason")
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
