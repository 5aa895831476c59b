//! Admin API version definitions.
//!
//! The tasks are pinned to [`ApiVersion::V2025_01`]; the other variants exist
//! so an operator can point the tool at a newer version without a rebuild.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Shopify Admin API version.
///
/// Shopify releases new API versions quarterly (January, April, July, October).
///
/// # Example
///
/// ```rust
/// use shopify_admin_tasks::ApiVersion;
///
/// let version: ApiVersion = "2025-01".parse().unwrap();
/// assert_eq!(version, ApiVersion::pinned());
/// assert_eq!(version.to_string(), "2025-01");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// API version 2025-01 (January 2025)
    V2025_01,
    /// API version 2025-04 (April 2025)
    V2025_04,
    /// API version 2025-07 (July 2025)
    V2025_07,
    /// API version 2025-10 (October 2025)
    V2025_10,
    /// Unstable API version.
    Unstable,
    /// Any other well-formed `YYYY-MM` release.
    Custom(String),
}

impl ApiVersion {
    /// Returns the version the task queries were written against.
    #[must_use]
    pub const fn pinned() -> Self {
        Self::V2025_01
    }

    /// Returns `true` if this is a known stable API version.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        !matches!(self, Self::Unstable | Self::Custom(_))
    }

    fn is_valid_version_format(s: &str) -> bool {
        let Some((year, month)) = s.split_once('-') else {
            return false;
        };

        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }

        matches!(month, "01" | "04" | "07" | "10")
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::pinned()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version_str = match self {
            Self::V2025_01 => "2025-01",
            Self::V2025_04 => "2025-04",
            Self::V2025_07 => "2025-07",
            Self::V2025_10 => "2025-10",
            Self::Unstable => "unstable",
            Self::Custom(s) => s,
        };
        f.write_str(version_str)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "2025-01" => Ok(Self::V2025_01),
            "2025-04" => Ok(Self::V2025_04),
            "2025-07" => Ok(Self::V2025_07),
            "2025-10" => Ok(Self::V2025_10),
            "unstable" => Ok(Self::Unstable),
            _ if Self::is_valid_version_format(&s) => Ok(Self::Custom(s)),
            _ => Err(ConfigError::InvalidApiVersion { version: s }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_version_is_2025_01() {
        assert_eq!(ApiVersion::pinned().to_string(), "2025-01");
        assert_eq!(ApiVersion::default(), ApiVersion::V2025_01);
    }

    #[test]
    fn test_api_version_parses_known_versions() {
        assert_eq!(
            "2025-04".parse::<ApiVersion>().unwrap(),
            ApiVersion::V2025_04
        );
        assert_eq!(
            " UNSTABLE ".parse::<ApiVersion>().unwrap(),
            ApiVersion::Unstable
        );
    }

    #[test]
    fn test_api_version_parses_other_releases_as_custom() {
        let version: ApiVersion = "2024-10".parse().unwrap();
        assert_eq!(version, ApiVersion::Custom("2024-10".to_string()));
        assert!(!version.is_stable());
        assert_eq!(version.to_string(), "2024-10");
    }

    #[test]
    fn test_api_version_rejects_invalid() {
        assert!("invalid".parse::<ApiVersion>().is_err());
        assert!("2025".parse::<ApiVersion>().is_err());
        assert!("2025-1".parse::<ApiVersion>().is_err());
        assert!("2025-02".parse::<ApiVersion>().is_err());
        assert!("25-01".parse::<ApiVersion>().is_err());
    }
}
