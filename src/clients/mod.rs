//! HTTP and GraphQL client types for Admin API communication.
//!
//! - [`HttpClient`]: POSTs JSON to the store with the access token header
//! - [`HttpResponse`]: status, headers and raw body of a response
//! - [`graphql::GraphqlClient`]: the GraphQL layer both tasks use
//! - [`HttpError`] / [`graphql::GraphqlError`]: failure classification
//!
//! Requests are attempted once. There is no retry, backoff or rate-limit
//! sleeping; the `X-Shopify-Shop-Api-Call-Limit` header is only parsed and
//! logged.

mod errors;
pub mod graphql;
mod http_client;
mod http_response;

pub use errors::{HttpError, HttpResponseError};
pub use graphql::{GraphqlClient, GraphqlError};
pub use http_client::{HttpClient, ACCESS_TOKEN_HEADER, SDK_VERSION};
pub use http_response::{ApiCallLimit, HttpResponse};
