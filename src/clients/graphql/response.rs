//! GraphQL request and response envelopes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Variables sent alongside a GraphQL document.
pub type Variables = serde_json::Map<String, serde_json::Value>;

/// The JSON body POSTed to `graphql.json`.
///
/// `variables` is omitted from the serialized body when `None`.
#[derive(Clone, Debug, Serialize)]
pub struct GraphqlRequest<'a> {
    /// The query or mutation text.
    pub query: &'a str,
    /// Variable values keyed by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<&'a Variables>,
}

/// Position of a GraphQL error in the submitted document.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GraphqlErrorLocation {
    /// Line number (1-based).
    pub line: i64,
    /// Column number (1-based).
    pub column: i64,
}

/// One entry of the `errors` array of a GraphQL response.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GraphqlErrorDescriptor {
    /// Human-readable message.
    pub message: String,
    /// Where in the document the error occurred.
    #[serde(default)]
    pub locations: Vec<GraphqlErrorLocation>,
    /// Response path of the failing field.
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

impl fmt::Display for GraphqlErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(location) = self.locations.first() {
            write!(f, " (line {}, column {})", location.line, location.column)?;
        }
        if !self.path.is_empty() {
            let path: Vec<String> = self
                .path
                .iter()
                .map(|segment| match segment {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            write!(f, " at {}", path.join("."))?;
        }
        Ok(())
    }
}

/// A decoded GraphQL response envelope.
///
/// `data` stays opaque until the caller decodes it into a task-specific shape
/// with [`GraphqlResponse::data_as`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphqlResponse {
    /// The raw `data` payload.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// GraphQL-level errors, in the order the service returned them.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<GraphqlErrorDescriptor>,
    /// Query cost and other service extensions.
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl GraphqlResponse {
    /// Decodes the `data` payload into `T`.
    ///
    /// A missing or `null` payload is decoded as JSON `null`, so `T` decides
    /// whether that is acceptable.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the payload does not match `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(self.data.as_ref().unwrap_or(&serde_json::Value::Null))
    }

    /// Returns `true` if the service reported any GraphQL errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<GraphqlErrorDescriptor>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Vec<GraphqlErrorDescriptor>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
