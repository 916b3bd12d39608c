//! Provider trait definition

use async_trait::async_trait;
use shelf_protocol::Book;

use crate::error::ProviderError;

/// How input terms are interpreted when building provider queries.
///
/// Mirrors the config-level setting; providers get their own copy so the
/// client crates do not depend on configuration loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Title,
    Subject,
    Isbn,
}

/// One page of term-search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Books on this page, already translated to the normalized record.
    pub books: Vec<Book>,
    /// Total matching results across all pages, as reported by the provider.
    pub total: u64,
}

/// Trait for book-metadata providers.
///
/// Implementations own their HTTP client and credentials and translate their
/// response shapes into [`Book`]. Transient upstream trouble (504/429) is
/// reported as an error with [`ProviderError::is_throttle`] set; the caller
/// decides whether to pause and retry.
#[async_trait]
pub trait BookProvider: Send + Sync {
    /// Provider name (e.g. "isbndb", "google")
    fn name(&self) -> &'static str;

    /// Rows per term-search page. Drives the `ceil(total / page_size)`
    /// pagination math in the search workers.
    fn page_size(&self) -> u64;

    /// Batch size for [`lookup_isbns`](Self::lookup_isbns), or `None` when
    /// the provider has no batched ISBN endpoint (terms are then searched
    /// one per line even in ISBN mode).
    fn isbn_batch_size(&self) -> Option<usize> {
        None
    }

    /// Search a term at a 1-based page.
    ///
    /// A provider 404 is not an error: it returns an empty page.
    async fn search(&self, term: &str, page: u64) -> Result<SearchPage, ProviderError>;

    /// Look up a batch of ISBNs in a single call.
    async fn lookup_isbns(&self, isbns: &[String]) -> Result<Vec<Book>, ProviderError>;
}
