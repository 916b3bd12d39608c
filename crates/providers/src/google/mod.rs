//! Google Books provider
//!
//! Volume search via `GET /volumes` with 40-row pages. Search keywords are
//! scoped with the field prefixes the API understands (`intitle:`,
//! `subject:`, `isbn:`). There is no batched ISBN endpoint.

mod types;

pub use types::{Volume, VolumeInfo, VolumeSearchResults};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use shelf_protocol::Book;
use tracing::debug;
use url::Url;

use crate::error::ProviderError;
use crate::traits::{BookProvider, SearchMode, SearchPage};

/// Rows per page; the API rejects anything larger.
pub const MAX_PAGE_SIZE: u64 = 40;

const API_URL: &str = "https://www.googleapis.com/books/v1";
const API_TIMEOUT: Duration = Duration::from_secs(120);

/// Google Books provider client.
pub struct GoogleProvider {
    client: reqwest::Client,
    base_url: Url,
    mode: SearchMode,
}

impl GoogleProvider {
    /// Create a new Google Books client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(mode: SearchMode) -> Result<Self, ProviderError> {
        Self::with_base_url(API_URL, mode)
    }

    /// Create a client against a custom base URL (tests, proxies).
    pub fn with_base_url(base_url: &str, mode: SearchMode) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("shelf/", env!("CARGO_PKG_VERSION")))
            .timeout(API_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Init(format!("Google Books HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            mode,
        })
    }

    /// Field-scoped query string for the configured mode.
    fn scoped_query(&self, term: &str) -> String {
        let prefix = match self.mode {
            SearchMode::Title => "intitle",
            SearchMode::Subject => "subject",
            SearchMode::Isbn => "isbn",
        };
        format!("{prefix}:{term}")
    }
}

#[async_trait]
impl BookProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn page_size(&self) -> u64 {
        MAX_PAGE_SIZE
    }

    async fn search(&self, term: &str, page: u64) -> Result<SearchPage, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Init("Google base URL cannot be a base".into()))?
            .push("volumes");

        let start_index = (page.saturating_sub(1)) * MAX_PAGE_SIZE;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("q", self.scoped_query(term)),
                ("startIndex", start_index.to_string()),
                ("maxResults", MAX_PAGE_SIZE.to_string()),
                ("filter", "full".to_string()),
                ("printType", "books".to_string()),
                ("projection", "full".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if let Some(err) = ProviderError::from_status(status) {
            return Err(err);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(SearchPage::default());
        }

        let body = response.text().await?;
        let results: VolumeSearchResults = serde_json::from_str(&body)?;
        debug!(
            term,
            page,
            total = results.total_items,
            returned = results.items.len(),
            "google volume search"
        );

        Ok(SearchPage {
            total: results.total_items,
            books: results.items.into_iter().map(Book::from).collect(),
        })
    }

    async fn lookup_isbns(&self, _isbns: &[String]) -> Result<Vec<Book>, ProviderError> {
        Err(ProviderError::Unsupported(
            "Google Books has no batched ISBN endpoint; use isbn-mode term search",
        ))
    }
}
