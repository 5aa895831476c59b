//! GraphQL-specific error types.
//!
//! Unlike a plain HTTP client, the GraphQL client treats a non-empty `errors`
//! array in a 200 response as a failure: [`GraphqlError::Response`] carries
//! every error descriptor together with whatever partial `data` came back.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_admin_tasks::clients::graphql::GraphqlError;
//!
//! match client.query("query { shop { name } }", None).await {
//!     Ok(response) => println!("Data: {:?}", response.data),
//!     Err(GraphqlError::Response { errors, .. }) => {
//!         for error in errors {
//!             println!("GraphQL error: {error}");
//!         }
//!     }
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use crate::clients::graphql::GraphqlErrorDescriptor;
use crate::clients::HttpError;
use thiserror::Error;

/// Error type for GraphQL API operations.
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// The request body could not be serialized.
    #[error("failed to marshal request: {0}")]
    Serialize(#[source] serde_json::Error),

    /// An HTTP-level error occurred: network failure or non-2xx status.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body was not a valid GraphQL envelope.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The service returned a non-empty `errors` array.
    #[error("GraphQL errors: {}", format_errors(.errors))]
    Response {
        /// All error descriptors, in the order returned.
        errors: Vec<GraphqlErrorDescriptor>,
        /// Partial data returned alongside the errors, if any.
        data: Option<serde_json::Value>,
    },
}

fn format_errors(errors: &[GraphqlErrorDescriptor]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
