//! Pipeline work units
//!
//! [`SearchQuery`] is what the feeder and workers pass around; [`BookBatch`]
//! is one page of provider results on its way to a writer.

use crate::book::Book;

/// One unit of provider work. Created by the feeder (page 1 / ISBN batch) or
/// by a worker scheduling the next page of a term; consumed by exactly one
/// worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Search a term (keyword or subject) at a specific page, 1-based.
    Term { term: String, page: u64 },
    /// Look up a batch of ISBNs in one provider call. Never paginates.
    IsbnBatch { isbns: Vec<String> },
}

impl SearchQuery {
    /// First-page query for a term.
    pub fn term(term: impl Into<String>) -> Self {
        Self::Term {
            term: term.into(),
            page: 1,
        }
    }

    /// Continuation for the next page of the same term.
    ///
    /// Returns `None` for ISBN batches, which have no pages.
    pub fn next_page(&self) -> Option<Self> {
        match self {
            Self::Term { term, page } => Some(Self::Term {
                term: term.clone(),
                page: page + 1,
            }),
            Self::IsbnBatch { .. } => None,
        }
    }
}

/// One page of search results bound for the writer pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookBatch {
    pub books: Vec<Book>,
    /// Term that produced this batch; `None` for ISBN-batch lookups.
    pub source_term: Option<String>,
    /// True when this is the final page for `source_term`. Persisting a batch
    /// with `last_page` set is what makes a term eligible for the progress
    /// journal. Always false for ISBN batches.
    pub last_page: bool,
}
