//! ISBNdb provider
//!
//! Term search via `GET /books/{query}` (1000-row pages) and batched ISBN
//! lookup via `POST /books` (up to 1000 ISBNs per call). The API host depends
//! on the subscription tier; the caller passes the right base URL in.

mod types;

pub use types::{BookSearchResults, IsbnLookupResults, IsbndbBook};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use shelf_protocol::Book;
use tracing::debug;
use url::Url;

use crate::error::ProviderError;
use crate::traits::{BookProvider, SearchMode, SearchPage};

/// Rows per page and maximum ISBNs per batched lookup.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Upstream responses can take a while on cold queries.
const API_TIMEOUT: Duration = Duration::from_secs(120);

/// ISBNdb client configuration.
#[derive(Debug, Clone)]
pub struct IsbndbConfig {
    /// Tier-specific API host, e.g. `https://api2.isbndb.com`.
    pub base_url: String,
    /// API key, sent in the `Authorization` header.
    pub api_key: String,
    /// How search terms are interpreted.
    pub mode: SearchMode,
}

/// ISBNdb provider client.
pub struct IsbndbProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
    mode: SearchMode,
}

impl IsbndbProvider {
    /// Create a new ISBNdb client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: IsbndbConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("shelf/", env!("CARGO_PKG_VERSION")))
            .timeout(API_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Init(format!("ISBNdb HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            api_key: config.api_key,
            mode: config.mode,
        })
    }

    /// Search column for the configured mode.
    fn column(&self) -> &'static str {
        match self.mode {
            SearchMode::Title => "title",
            SearchMode::Subject => "subjects",
            // ISBN mode goes through the batched endpoint; an ISBN landing
            // here falls back to the full-text column.
            SearchMode::Isbn => "",
        }
    }

    fn search_url(&self, term: &str) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Init("ISBNdb base URL cannot be a base".into()))?
            .push("books")
            .push(term);
        Ok(url)
    }

    /// Decode a response body, mapping transient statuses to throttle errors.
    async fn read_body(&self, response: reqwest::Response) -> Result<Option<String>, ProviderError> {
        let status = response.status();
        if let Some(err) = ProviderError::from_status(status) {
            return Err(err);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl BookProvider for IsbndbProvider {
    fn name(&self) -> &'static str {
        "isbndb"
    }

    fn page_size(&self) -> u64 {
        MAX_PAGE_SIZE
    }

    fn isbn_batch_size(&self) -> Option<usize> {
        Some(MAX_PAGE_SIZE as usize)
    }

    async fn search(&self, term: &str, page: u64) -> Result<SearchPage, ProviderError> {
        let url = self.search_url(term)?;
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, &self.api_key)
            .header(ACCEPT, "application/json")
            .query(&[
                ("page", page.to_string()),
                ("pageSize", MAX_PAGE_SIZE.to_string()),
                ("column", self.column().to_string()),
            ])
            .send()
            .await?;

        let Some(body) = self.read_body(response).await? else {
            return Ok(SearchPage::default());
        };
        let results: BookSearchResults = serde_json::from_str(&body)?;
        debug!(
            term,
            page,
            total = results.total,
            returned = results.books.len(),
            "isbndb search"
        );

        Ok(SearchPage {
            total: results.total,
            books: results.books.into_iter().map(Book::from).collect(),
        })
    }

    async fn lookup_isbns(&self, isbns: &[String]) -> Result<Vec<Book>, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Init("ISBNdb base URL cannot be a base".into()))?
            .push("books");

        // The endpoint takes form-style `isbns=<comma separated>` in the body.
        let body = format!("isbns={}", isbns.join(","));
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, &self.api_key)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let Some(body) = self.read_body(response).await? else {
            return Ok(Vec::new());
        };
        let results: IsbnLookupResults = serde_json::from_str(&body)?;
        debug!(
            requested = isbns.len(),
            returned = results.data.len(),
            "isbndb isbn lookup"
        );

        Ok(results.data.into_iter().map(Book::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(mode: SearchMode) -> IsbndbProvider {
        IsbndbProvider::new(IsbndbConfig {
            base_url: "https://api2.isbndb.com".into(),
            api_key: "test-key".into(),
            mode,
        })
        .unwrap()
    }

    #[test]
    fn column_follows_mode() {
        assert_eq!(provider(SearchMode::Title).column(), "title");
        assert_eq!(provider(SearchMode::Subject).column(), "subjects");
        assert_eq!(provider(SearchMode::Isbn).column(), "");
    }

    #[test]
    fn search_url_encodes_terms() {
        let url = provider(SearchMode::Title)
            .search_url("naval history & war")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api2.isbndb.com/books/naval%20history%20&%20war"
        );
    }

    #[test]
    fn page_geometry() {
        let p = provider(SearchMode::Title);
        assert_eq!(p.page_size(), 1000);
        assert_eq!(p.isbn_batch_size(), Some(1000));
    }
}
