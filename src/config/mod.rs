//! Configuration types for the Admin API tasks.
//!
//! # Overview
//!
//! - [`TasksConfig`]: immutable settings shared by the client and both tasks
//! - [`TasksConfigBuilder`]: builder for [`TasksConfig`]
//! - [`StoreUrl`], [`AccessToken`], [`StorePassword`]: validated newtypes
//! - [`ApiVersion`]: the Admin API version to target
//!
//! # Environment
//!
//! [`TasksConfig::from_env`] reads the following variables, after loading a
//! `.env` file if one is present:
//!
//! | Variable | Required |
//! |---|---|
//! | `SHOPIFY_URL` | yes |
//! | `SHOPIFY_ACCESS_TOKEN` | yes |
//! | `SHOPIFY_USER_EMAIL` | no |
//! | `SHOPIFY_STORE_PASSWORD` | no |
//! | `SHOPIFY_API_VERSION` | no (defaults to `2025-01`) |
//!
//! # Example
//!
//! ```rust
//! use shopify_admin_tasks::{TasksConfig, StoreUrl, AccessToken};
//!
//! let config = TasksConfig::builder()
//!     .store_url(StoreUrl::new("https://my-store.myshopify.com").unwrap())
//!     .access_token(AccessToken::new("shpat_123").unwrap())
//!     .operator_email("ops@example.com")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.operator_email(), Some("ops@example.com"));
//! ```

mod newtypes;
mod version;

pub use newtypes::{AccessToken, StorePassword, StoreUrl};
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Environment variable holding the store URL.
pub const ENV_STORE_URL: &str = "SHOPIFY_URL";
/// Environment variable holding the Admin API access token.
pub const ENV_ACCESS_TOKEN: &str = "SHOPIFY_ACCESS_TOKEN";
/// Environment variable holding the operator's checkout email.
pub const ENV_OPERATOR_EMAIL: &str = "SHOPIFY_USER_EMAIL";
/// Environment variable holding the storefront password.
pub const ENV_STORE_PASSWORD: &str = "SHOPIFY_STORE_PASSWORD";
/// Environment variable overriding the Admin API version.
pub const ENV_API_VERSION: &str = "SHOPIFY_API_VERSION";

/// Settings shared by the GraphQL client and both tasks.
///
/// Built once at startup and passed by reference to everything that needs it.
#[derive(Clone, Debug)]
pub struct TasksConfig {
    store_url: StoreUrl,
    access_token: AccessToken,
    operator_email: Option<String>,
    store_password: Option<StorePassword>,
    api_version: ApiVersion,
    user_agent_prefix: Option<String>,
}

impl TasksConfig {
    /// Creates a new builder for constructing a `TasksConfig`.
    #[must_use]
    pub fn builder() -> TasksConfigBuilder {
        TasksConfigBuilder::new()
    }

    /// Loads configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` first so a local `.env` file is honoured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `SHOPIFY_URL` or
    /// `SHOPIFY_ACCESS_TOKEN` is unset or empty, or a validation error if a
    /// value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is not an error
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// See [`TasksConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let store_url = get(ENV_STORE_URL).ok_or(ConfigError::MissingEnvVar {
            name: ENV_STORE_URL,
        })?;
        let access_token = get(ENV_ACCESS_TOKEN).ok_or(ConfigError::MissingEnvVar {
            name: ENV_ACCESS_TOKEN,
        })?;

        let mut builder = Self::builder()
            .store_url(StoreUrl::new(store_url)?)
            .access_token(AccessToken::new(access_token)?);

        if let Some(email) = get(ENV_OPERATOR_EMAIL) {
            builder = builder.operator_email(email);
        }
        if let Some(password) = get(ENV_STORE_PASSWORD) {
            builder = builder.store_password(StorePassword::new(password)?);
        }
        if let Some(version) = get(ENV_API_VERSION) {
            builder = builder.api_version(version.parse()?);
        }

        builder.build()
    }

    /// Returns the store URL.
    #[must_use]
    pub const fn store_url(&self) -> &StoreUrl {
        &self.store_url
    }

    /// Returns the Admin API access token.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the operator's checkout email, if configured.
    #[must_use]
    pub fn operator_email(&self) -> Option<&str> {
        self.operator_email.as_deref()
    }

    /// Returns the storefront password, if configured.
    #[must_use]
    pub const fn store_password(&self) -> Option<&StorePassword> {
        self.store_password.as_ref()
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns a copy of this configuration targeting another API version.
    #[must_use]
    pub fn with_api_version(&self, api_version: ApiVersion) -> Self {
        Self {
            api_version,
            ..self.clone()
        }
    }
}

/// Builder for [`TasksConfig`].
///
/// `store_url` and `access_token` are required. Defaults:
///
/// - `api_version`: [`ApiVersion::pinned`]
/// - `operator_email`, `store_password`, `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct TasksConfigBuilder {
    store_url: Option<StoreUrl>,
    access_token: Option<AccessToken>,
    operator_email: Option<String>,
    store_password: Option<StorePassword>,
    api_version: Option<ApiVersion>,
    user_agent_prefix: Option<String>,
}

impl TasksConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the store URL (required).
    #[must_use]
    pub fn store_url(mut self, url: StoreUrl) -> Self {
        self.store_url = Some(url);
        self
    }

    /// Sets the access token (required).
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the operator's checkout email.
    #[must_use]
    pub fn operator_email(mut self, email: impl Into<String>) -> Self {
        self.operator_email = Some(email.into());
        self
    }

    /// Sets the storefront password.
    #[must_use]
    pub fn store_password(mut self, password: StorePassword) -> Self {
        self.store_password = Some(password);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`TasksConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `store_url` or
    /// `access_token` are not set.
    pub fn build(self) -> Result<TasksConfig, ConfigError> {
        let store_url = self
            .store_url
            .ok_or(ConfigError::MissingRequiredField { field: "store_url" })?;
        let access_token = self
            .access_token
            .ok_or(ConfigError::MissingRequiredField {
                field: "access_token",
            })?;

        Ok(TasksConfig {
            store_url,
            access_token,
            operator_email: self.operator_email,
            store_password: self.store_password,
            api_version: self.api_version.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
