//! Provider selection and credentials

use serde::Deserialize;

const ISBNDB_URL_BASIC: &str = "https://api2.isbndb.com";
const ISBNDB_URL_PREMIUM: &str = "https://api.premium.isbndb.com";
const ISBNDB_URL_PRO: &str = "https://api.pro.isbndb.com";

/// Which book-metadata provider to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Isbndb,
    Google,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Isbndb => "isbndb",
            Self::Google => "google",
        };
        write!(f, "{s}")
    }
}

/// ISBNdb subscription tier. Each tier has its own API host and per-second
/// call allowance (1/3/5); `calls_per_second` should not exceed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsbndbTier {
    #[default]
    Basic,
    Premium,
    Pro,
}

impl IsbndbTier {
    /// API base URL for this tier.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Basic => ISBNDB_URL_BASIC,
            Self::Premium => ISBNDB_URL_PREMIUM,
            Self::Pro => ISBNDB_URL_PRO,
        }
    }

    /// Calls per second the tier allows.
    pub fn max_calls_per_second(&self) -> u32 {
        match self {
            Self::Basic => 1,
            Self::Premium => 3,
            Self::Pro => 5,
        }
    }
}

/// Provider configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider to bind. Default: isbndb
    pub kind: ProviderKind,

    /// ISBNdb subscription tier. Required when `kind = "isbndb"`.
    pub isbndb_subscription: IsbndbTier,

    /// ISBNdb API key. Required when `kind = "isbndb"`.
    pub isbndb_api_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_urls() {
        assert_eq!(IsbndbTier::Basic.base_url(), "https://api2.isbndb.com");
        assert_eq!(
            IsbndbTier::Premium.base_url(),
            "https://api.premium.isbndb.com"
        );
        assert_eq!(IsbndbTier::Pro.base_url(), "https://api.pro.isbndb.com");
    }

    #[test]
    fn tier_budgets() {
        assert_eq!(IsbndbTier::Basic.max_calls_per_second(), 1);
        assert_eq!(IsbndbTier::Pro.max_calls_per_second(), 5);
    }
}
