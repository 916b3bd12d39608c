//! Cross-field configuration validation

use crate::Config;
use crate::error::{ConfigError, Result};
use crate::provider::ProviderKind;

/// Validate the full configuration.
///
/// Deserialization already guarantees the enums; this checks the constraints
/// serde cannot express: required fields and numeric lower bounds.
pub fn validate(config: &Config) -> Result<()> {
    if config.ingest.file.is_empty() {
        return Err(ConfigError::missing_field("ingest", "file"));
    }

    if config.ingest.calls_per_second < 1 {
        return Err(ConfigError::invalid_value(
            "ingest",
            "calls_per_second",
            "must be at least 1",
        ));
    }

    if config.ingest.db_writers < 1 {
        return Err(ConfigError::invalid_value(
            "ingest",
            "db_writers",
            "must be at least 1",
        ));
    }

    if config.provider.kind == ProviderKind::Isbndb && config.provider.isbndb_api_key.is_empty() {
        return Err(ConfigError::missing_field("provider", "isbndb_api_key"));
    }

    // A budget above the subscription tier's allowance would only produce a
    // stream of 429s and pipeline pauses.
    if config.provider.kind == ProviderKind::Isbndb
        && config.provider.isbndb_subscription.max_calls_per_second()
            < config.ingest.calls_per_second
    {
        return Err(ConfigError::invalid_value(
            "ingest",
            "calls_per_second",
            format!(
                "exceeds the {} calls/s the ISBNdb subscription allows",
                config.provider.isbndb_subscription.max_calls_per_second(),
            ),
        ));
    }

    if config.database.host.is_empty() {
        return Err(ConfigError::missing_field("database", "host"));
    }
    if config.database.username.is_empty() {
        return Err(ConfigError::missing_field("database", "username"));
    }
    if config.database.password.is_empty() {
        return Err(ConfigError::missing_field("database", "password"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.ingest.file = "terms.txt".into();
        config.provider.isbndb_api_key = "key".into();
        config.database.host = "localhost".into();
        config.database.username = "shelf".into();
        config.database.password = "pw".into();
        config
    }

    #[test]
    fn valid_config_passes() {
        valid_config().validate().unwrap();
    }

    #[test]
    fn missing_file_fails() {
        let mut config = valid_config();
        config.ingest.file.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { field: "file", .. })
        ));
    }

    #[test]
    fn isbndb_requires_api_key() {
        let mut config = valid_config();
        config.provider.isbndb_api_key.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn google_does_not_require_api_key() {
        let mut config = valid_config();
        config.provider.kind = ProviderKind::Google;
        config.provider.isbndb_api_key.clear();
        config.validate().unwrap();
    }

    #[test]
    fn zero_calls_per_second_fails() {
        let mut config = valid_config();
        config.ingest.calls_per_second = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn budget_above_the_tier_allowance_fails() {
        let mut config = valid_config();
        config.ingest.calls_per_second = 3; // basic tier allows 1
        assert!(config.validate().is_err());
    }

    #[test]
    fn pro_tier_allows_a_larger_budget() {
        let mut config = valid_config();
        config.provider.isbndb_subscription = crate::IsbndbTier::Pro;
        config.ingest.calls_per_second = 5;
        config.validate().unwrap();
    }

    #[test]
    fn missing_db_password_fails() {
        let mut config = valid_config();
        config.database.password.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField {
                field: "password",
                ..
            })
        ));
    }
}
