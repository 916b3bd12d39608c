//! Ingestion settings

use serde::Deserialize;

/// What the input file's lines mean and how to search for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBy {
    /// Lines are title keywords.
    #[default]
    Title,
    /// Lines are subject names.
    Subject,
    /// Lines are ISBNs; batched where the provider supports it.
    Isbn,
}

impl std::fmt::Display for SearchBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Title => "title",
            Self::Subject => "subject",
            Self::Isbn => "isbn",
        };
        write!(f, "{s}")
    }
}

/// Ingestion pipeline settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Search mode for input lines.
    pub search_by: SearchBy,

    /// Path to the input file, one term per line. Required.
    pub file: String,

    /// Provider call budget per second.
    /// Default: 1
    pub calls_per_second: u32,

    /// How long to pause the whole pipeline after a 504/429 response.
    /// Default: 0 (retry immediately)
    pub timeout_seconds: u64,

    /// Number of concurrent database writer tasks. Mind how many concurrent
    /// connections the database can take.
    /// Default: 1
    pub db_writers: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            search_by: SearchBy::Title,
            file: String::new(),
            calls_per_second: 1,
            timeout_seconds: 0,
            db_writers: 1,
        }
    }
}
