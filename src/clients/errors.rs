//! HTTP-level error types.
//!
//! - [`HttpResponseError`]: a non-2xx response from the Admin API
//! - [`HttpError`]: unified error for everything that can go wrong between
//!   building the request and reading the response body
//!
//! There is no retry error: every request is attempted exactly once.

use thiserror::Error;

/// Error returned when the Admin API answers with a non-2xx status.
///
/// `message` holds the raw response body so the operator can see exactly what
/// the service reported.
///
/// # Example
///
/// ```rust
/// use shopify_admin_tasks::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 401,
///     message: r#"{"errors":"Invalid API key or access token"}"#.to_string(),
///     error_reference: None,
/// };
///
/// assert!(error.to_string().contains("status 401"));
/// ```
#[derive(Debug, Error)]
#[error("API request failed with status {code}: {message}{}", format_reference(.error_reference))]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The raw response body.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
}

fn format_reference(reference: &Option<String>) -> String {
    reference.as_ref().map_or_else(String::new, |id| {
        format!(" (if you report this error, please include this id: {id})")
    })
}

/// Unified error type for HTTP transport failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Network or connection error: refused, DNS, TLS, body read failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
