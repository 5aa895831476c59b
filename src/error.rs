//! Error types for task configuration.
//!
//! Configuration constructors return `Result<T, ConfigError>` so that missing
//! or malformed settings are caught before any request is sent.
//!
//! # Example
//!
//! ```rust
//! use shopify_admin_tasks::{AccessToken, ConfigError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a [`TasksConfig`](crate::TasksConfig).
///
/// Every variant is a pre-flight failure: the orchestrator aborts before any
/// task runs when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Please provide a valid Shopify Admin API access token.")]
    EmptyAccessToken,

    /// Store password cannot be empty when provided.
    #[error("Store password cannot be empty when set.")]
    EmptyStorePassword,

    /// Store URL is invalid.
    #[error("Invalid store URL '{url}'. Please provide a URL with scheme (e.g., 'https://my-store.myshopify.com').")]
    InvalidStoreUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM' (e.g., '2025-01') or 'unstable'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A required environment variable is missing.
    #[error("Missing required environment variable {name}. SHOPIFY_URL and SHOPIFY_ACCESS_TOKEN are required.")]
    MissingEnvVar {
        /// The name of the missing variable.
        name: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_access_token_error_message() {
        let message = ConfigError::EmptyAccessToken.to_string();
        assert!(message.contains("Access token cannot be empty"));
    }

    #[test]
    fn test_invalid_store_url_error_message() {
        let error = ConfigError::InvalidStoreUrl {
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("with scheme"));
    }

    #[test]
    fn test_missing_env_var_names_both_required_variables() {
        let error = ConfigError::MissingEnvVar {
            name: "SHOPIFY_URL",
        };
        let message = error.to_string();
        assert!(message.contains("SHOPIFY_URL"));
        assert!(message.contains("SHOPIFY_ACCESS_TOKEN"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField {
            field: "access_token",
        };
        let message = error.to_string();
        assert!(message.contains("access_token"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyAccessToken;
        let _: &dyn std::error::Error = &error;
    }
}
