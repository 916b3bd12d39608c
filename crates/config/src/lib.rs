//! Shelf Configuration
//!
//! TOML-based configuration loading with sensible defaults. A minimal config
//! only needs the input file and provider credentials:
//!
//! ```toml
//! [ingest]
//! file = "terms.txt"
//!
//! [provider]
//! kind = "isbndb"
//! isbndb_subscription = "basic"
//! isbndb_api_key = "..."
//!
//! [database]
//! host = "127.0.0.1"
//! username = "shelf"
//! password = "secret"
//! ```
//!
//! Use [`Config::from_file`] or the `FromStr` impl to parse, then
//! [`Config::validate`] before wiring anything up.

mod database;
mod error;
mod ingest;
mod logging;
mod provider;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

pub use database::DatabaseConfig;
pub use error::{ConfigError, Result};
pub use ingest::{IngestConfig, SearchBy};
pub use logging::LogConfig;
pub use provider::{IsbndbTier, ProviderConfig, ProviderKind};

/// Main configuration structure.
///
/// All sections are optional in the TOML; required *fields* are enforced by
/// [`Config::validate`], not by deserialization, so partial files parse and
/// produce a readable error instead of a serde one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ingestion settings (input file, rate budget, writer pool).
    pub ingest: IngestConfig,

    /// Which provider to drive and its credentials.
    pub provider: ProviderConfig,

    /// MySQL connection settings for the books and progress databases.
    pub database: DatabaseConfig,

    /// Logging configuration.
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        contents.parse()
    }

    /// Validate cross-field constraints. Call after loading.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Name of the books database, derived from the provider when unset.
    pub fn books_db_name(&self) -> String {
        if self.database.books_name.is_empty() {
            format!("book_data_{}", self.provider.kind)
        } else {
            self.database.books_name.clone()
        }
    }

    /// Name of the progress database, derived from the provider when unset.
    pub fn progress_db_name(&self) -> String {
        if self.database.progress_name.is_empty() {
            format!("progress_{}", self.provider.kind)
        } else {
            self.database.progress_name.clone()
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
