//! Normalized book record
//!
//! The superset of the fields either provider can return. Fields a provider
//! does not know are left empty (`String::new()`) or `None`; the store writes
//! them through as-is.

/// A secondary ISBN attached to a book (other bindings of the same title).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtherIsbn {
    pub isbn: String,
    pub binding: String,
}

/// An industry identifier reported by the provider (e.g. ISBN_10, ISBN_13).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndustryIdentifier {
    pub kind: String,
    pub identifier: String,
}

/// Provider-agnostic book record.
///
/// `natural_key` is the provider's stable identifier: ISBN-13 for ISBNdb,
/// the opaque volume id for Google Books. It is the dedup key for the whole
/// pipeline and must be set by the provider translation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    pub natural_key: String,
    pub title: String,
    pub title_long: String,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub dewey_decimal: String,
    pub binding: String,
    /// Publisher display name; resolved to a dimension row by the store.
    pub publisher: String,
    /// Language display name; resolved to a dimension row by the store.
    pub language: String,
    pub date_published: String,
    pub edition: String,
    pub pages: i64,
    pub dimensions: String,
    pub overview: String,
    pub image: String,
    pub msrp: String,
    pub excerpt: String,
    pub synopsis: String,
    pub related_type: String,
    pub authors: Vec<String>,
    pub subjects: Vec<String>,
    pub reviews: Vec<String>,
    pub other_isbns: Vec<OtherIsbn>,
    pub industry_identifiers: Vec<IndustryIdentifier>,
}

impl Book {
    /// Minimal record for tests and fixtures.
    pub fn with_key(natural_key: impl Into<String>) -> Self {
        Self {
            natural_key: natural_key.into(),
            ..Self::default()
        }
    }
}
