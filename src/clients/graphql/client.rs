//! GraphQL client implementation for the Admin API.

use crate::clients::graphql::{GraphqlError, GraphqlRequest, GraphqlResponse, Variables};
use crate::clients::HttpClient;
use crate::config::{ApiVersion, TasksConfig};

/// GraphQL API client for the Shopify Admin API.
///
/// Wraps an [`HttpClient`] pointed at `/admin/api/{version}` and turns every
/// call into a single POST to `graphql.json`. The client is reusable across
/// calls and holds no per-call state.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_admin_tasks::{GraphqlClient, TasksConfig};
/// use serde_json::json;
///
/// let config = TasksConfig::from_env()?;
/// let client = GraphqlClient::new(&config)?;
///
/// let mut variables = serde_json::Map::new();
/// variables.insert("handle".into(), json!("the-videographer-snowboard"));
///
/// let response = client
///     .query("query($handle: String!) { productByHandle(handle: $handle) { id } }", Some(&variables))
///     .await?;
/// ```
#[derive(Debug)]
pub struct GraphqlClient {
    http_client: HttpClient,
    api_version: ApiVersion,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Path of the GraphQL endpoint relative to the versioned base path.
    pub const ENDPOINT: &'static str = "graphql.json";

    /// Creates a new GraphQL client using the configured API version.
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Http`] if the HTTP client cannot be initialized.
    pub fn new(config: &TasksConfig) -> Result<Self, GraphqlError> {
        let api_version = config.api_version().clone();
        let base_path = format!("/admin/api/{api_version}");
        let http_client = HttpClient::new(base_path, config)?;

        tracing::debug!(
            endpoint = %http_client.url_for(Self::ENDPOINT),
            "GraphQL client ready"
        );

        Ok(Self {
            http_client,
            api_version,
        })
    }

    /// Returns the API version being used by this client.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the full endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.http_client.url_for(Self::ENDPOINT)
    }

    /// Executes a GraphQL query or mutation.
    ///
    /// The document is not validated locally; a malformed query surfaces as a
    /// [`GraphqlError::Response`] reported by the service.
    ///
    /// # Errors
    ///
    /// - [`GraphqlError::Serialize`] if the request body cannot be serialized
    /// - [`GraphqlError::Http`] for network failures and non-2xx statuses
    /// - [`GraphqlError::Decode`] if the body is not a GraphQL envelope
    /// - [`GraphqlError::Response`] if the `errors` array is non-empty, even
    ///   when `data` is partially populated
    pub async fn query(
        &self,
        query: &str,
        variables: Option<&Variables>,
    ) -> Result<GraphqlResponse, GraphqlError> {
        let body = serde_json::to_string(&GraphqlRequest { query, variables })
            .map_err(GraphqlError::Serialize)?;

        let http_response = self.http_client.post_json(Self::ENDPOINT, body).await?;

        let response: GraphqlResponse =
            serde_json::from_str(&http_response.body).map_err(GraphqlError::Decode)?;

        if let Some(extensions) = &response.extensions {
            tracing::debug!(%extensions, "GraphQL extensions");
        }

        if response.has_errors() {
            return Err(GraphqlError::Response {
                errors: response.errors,
                data: response.data,
            });
        }

        Ok(response)
    }
}
