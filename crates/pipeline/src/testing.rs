//! Test doubles for the pipeline seams
//!
//! A scriptable provider and in-memory store/journal so the pipeline can be
//! driven end-to-end without network or database.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use shelf_protocol::{Book, normalize_name};
use shelf_providers::{BookProvider, ProviderError, SearchPage};

use crate::error::PipelineError;
use crate::traits::{BookStore, PersistOutcome, TermJournal};

/// One scripted provider response.
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Page { books: Vec<Book>, total: u64 },
    Throttle,
    Fatal,
}

/// Provider whose responses are scripted per (term, page) and per ISBN batch.
///
/// Responses for a key are consumed front to back; the last one repeats, so
/// a single stub serves repeated calls and a `[Throttle, Page]` sequence
/// models fail-once-then-succeed.
pub(crate) struct MockProvider {
    pages: Mutex<HashMap<(String, u64), VecDeque<Scripted>>>,
    isbn_results: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<String>>,
    isbn_batches: Mutex<Vec<usize>>,
    page_size: u64,
    isbn_batch: Option<usize>,
}

impl MockProvider {
    pub(crate) fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            isbn_results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            isbn_batches: Mutex::new(Vec::new()),
            page_size: 1000,
            isbn_batch: Some(1000),
        }
    }

    pub(crate) fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub(crate) fn with_isbn_batch(mut self, batch: Option<usize>) -> Self {
        self.isbn_batch = batch;
        self
    }

    /// Append a scripted response for a (term, page) key.
    pub(crate) fn push_response(&self, term: &str, page: u64, scripted: Scripted) {
        self.pages
            .lock()
            .unwrap()
            .entry((term.to_owned(), page))
            .or_default()
            .push_back(scripted);
    }

    /// Stub a successful page.
    pub(crate) fn stub_page(&self, term: &str, page: u64, books: Vec<Book>, total: u64) {
        self.push_response(term, page, Scripted::Page { books, total });
    }

    /// Stub a successful ISBN batch result.
    pub(crate) fn stub_isbn_result(&self, books: Vec<Book>) {
        self.isbn_results
            .lock()
            .unwrap()
            .push_back(Scripted::Page { books, total: 0 });
    }

    /// Number of provider calls made so far.
    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Sizes of the ISBN batches received, in call order.
    pub(crate) fn isbn_batch_sizes(&self) -> Vec<usize> {
        self.isbn_batches.lock().unwrap().clone()
    }

    fn next_scripted(queue: &mut VecDeque<Scripted>) -> Option<Scripted> {
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl BookProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn page_size(&self) -> u64 {
        self.page_size
    }

    fn isbn_batch_size(&self) -> Option<usize> {
        self.isbn_batch
    }

    async fn search(&self, term: &str, page: u64) -> Result<SearchPage, ProviderError> {
        self.calls.lock().unwrap().push(format!("{term}#{page}"));

        let scripted = {
            let mut pages = self.pages.lock().unwrap();
            pages
                .get_mut(&(term.to_owned(), page))
                .and_then(Self::next_scripted)
        };

        match scripted {
            Some(Scripted::Page { books, total }) => Ok(SearchPage { books, total }),
            Some(Scripted::Throttle) => Err(ProviderError::GatewayTimeout),
            Some(Scripted::Fatal) => Err(ProviderError::Unsupported("scripted failure")),
            None => Ok(SearchPage::default()),
        }
    }

    async fn lookup_isbns(&self, isbns: &[String]) -> Result<Vec<Book>, ProviderError> {
        self.calls.lock().unwrap().push(format!("isbns:{}", isbns.len()));
        self.isbn_batches.lock().unwrap().push(isbns.len());

        let scripted = {
            let mut results = self.isbn_results.lock().unwrap();
            Self::next_scripted(&mut results)
        };

        match scripted {
            Some(Scripted::Page { books, .. }) => Ok(books),
            Some(Scripted::Throttle) => Err(ProviderError::RateLimited),
            Some(Scripted::Fatal) => Err(ProviderError::Unsupported("scripted failure")),
            None => Ok(Vec::new()),
        }
    }
}

/// In-memory [`BookStore`] with the same dedup gate as the real catalog.
pub(crate) struct MemoryStore {
    keys: Mutex<HashSet<String>>,
    books: Mutex<Vec<Book>>,
    fail_next: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            keys: Mutex::new(HashSet::new()),
            books: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Make the next persist call return a store error.
    pub(crate) fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub(crate) fn book_count(&self) -> usize {
        self.books.lock().unwrap().len()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.keys.lock().unwrap().contains(key)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn persist(&self, book: &Book) -> Result<PersistOutcome, PipelineError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(PipelineError::store(std::io::Error::other(
                "scripted store failure",
            )));
        }

        let key = normalize_name(&book.natural_key);
        if !self.keys.lock().unwrap().insert(key) {
            return Ok(PersistOutcome::Duplicate);
        }
        self.books.lock().unwrap().push(book.clone());
        Ok(PersistOutcome::Saved)
    }
}

/// In-memory [`TermJournal`].
pub(crate) struct MemoryJournal {
    terms: Mutex<Vec<String>>,
}

impl MemoryJournal {
    pub(crate) fn new() -> Self {
        Self {
            terms: Mutex::new(Vec::new()),
        }
    }

    /// Pre-mark a term complete, as if loaded from a previous run.
    pub(crate) fn preload(&self, term: &str) {
        self.terms.lock().unwrap().push(term.to_owned());
    }

    /// All journaled terms in insertion order.
    pub(crate) fn completed(&self) -> Vec<String> {
        self.terms.lock().unwrap().clone()
    }
}

#[async_trait]
impl TermJournal for MemoryJournal {
    async fn is_complete(&self, term: &str) -> bool {
        self.terms.lock().unwrap().iter().any(|t| t == term)
    }

    async fn mark_complete(&self, term: &str) -> Result<(), PipelineError> {
        let mut terms = self.terms.lock().unwrap();
        if !terms.iter().any(|t| t == term) {
            terms.push(term.to_owned());
        }
        Ok(())
    }
}
