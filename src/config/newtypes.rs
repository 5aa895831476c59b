//! Validated newtype wrappers for configuration values.
//!
//! These wrap the raw strings read from the environment and validate them on
//! construction. Secrets mask themselves in `Debug` output so that a logged
//! configuration never leaks credentials.

use crate::error::ConfigError;
use std::fmt;

/// A validated Shopify store URL (e.g., `https://my-store.myshopify.com`).
///
/// The URL must carry a scheme and a host. A trailing slash is stripped so the
/// Admin API path can be appended directly.
///
/// # Example
///
/// ```rust
/// use shopify_admin_tasks::StoreUrl;
///
/// let url = StoreUrl::new("https://my-store.myshopify.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://my-store.myshopify.com");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "my-store.myshopify.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl StoreUrl {
    /// Creates a new validated store URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStoreUrl`] if the URL has no scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidStoreUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidStoreUrl { url });
        }

        let host_start = scheme_end + 3;
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidStoreUrl { url });
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }
}

impl AsRef<str> for StoreUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// A validated Admin API access token.
///
/// The `Debug` implementation masks the value, displaying only
/// `AccessToken(*****)`.
///
/// # Example
///
/// ```rust
/// use shopify_admin_tasks::AccessToken;
///
/// let token = AccessToken::new("shpat_123").unwrap();
/// assert_eq!(token.as_ref(), "shpat_123");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// The storefront password printed in the manual checkout instructions.
///
/// Masked in `Debug` output like [`AccessToken`]; it is only ever shown to the
/// operator through the fallback instructions.
#[derive(Clone, PartialEq, Eq)]
pub struct StorePassword(String);

impl StorePassword {
    /// Creates a new store password.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyStorePassword`] if the password is empty.
    pub fn new(password: impl Into<String>) -> Result<Self, ConfigError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ConfigError::EmptyStorePassword);
        }
        Ok(Self(password))
    }
}

impl AsRef<str> for StorePassword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StorePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StorePassword(*****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_url_accepts_https_url() {
        let url = StoreUrl::new("https://my-store.myshopify.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_name(), "my-store.myshopify.com");
    }

    #[test]
    fn test_store_url_strips_trailing_slash() {
        let url = StoreUrl::new("https://my-store.myshopify.com///").unwrap();
        assert_eq!(url.as_ref(), "https://my-store.myshopify.com");
    }

    #[test]
    fn test_store_url_keeps_port() {
        let url = StoreUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.host_name(), "127.0.0.1");
        assert_eq!(url.as_ref(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_store_url_rejects_missing_scheme() {
        assert!(matches!(
            StoreUrl::new("my-store.myshopify.com"),
            Err(ConfigError::InvalidStoreUrl { .. })
        ));
    }

    #[test]
    fn test_store_url_rejects_missing_host() {
        assert!(StoreUrl::new("https://").is_err());
        assert!(StoreUrl::new("https:///admin").is_err());
        assert!(StoreUrl::new("").is_err());
    }

    #[test]
    fn test_access_token_rejects_empty_string() {
        assert!(matches!(
            AccessToken::new(""),
            Err(ConfigError::EmptyAccessToken)
        ));
        assert!(matches!(
            AccessToken::new("   "),
            Err(ConfigError::EmptyAccessToken)
        ));
    }

    #[test]
    fn test_access_token_debug_is_masked() {
        let token = AccessToken::new("shpat_secret").unwrap();
        let debug = format!("{token:?}");
        assert_eq!(debug, "AccessToken(*****)");
        assert!(!debug.contains("shpat_secret"));
    }

    #[test]
    fn test_store_password_debug_is_masked() {
        let password = StorePassword::new("hunter2").unwrap();
        assert_eq!(format!("{password:?}"), "StorePassword(*****)");
        assert_eq!(password.as_ref(), "hunter2");
    }

    #[test]
    fn test_store_password_rejects_empty_string() {
        assert!(matches!(
            StorePassword::new(""),
            Err(ConfigError::EmptyStorePassword)
        ));
    }
}
