//! Shelf - Providers
//!
//! Clients for the external book-metadata APIs, behind the [`BookProvider`]
//! trait. The rest of the pipeline never sees a provider's own response
//! shapes: each client translates into [`shelf_protocol::Book`] at the edge.
//!
//! Two providers are supported:
//!
//! - **ISBNdb** ([`isbndb::IsbndbProvider`]): term search with 1000-row
//!   pages, plus batched lookup of up to 1000 ISBNs per call.
//! - **Google Books** ([`google::GoogleProvider`]): volume search with
//!   40-row pages; ISBN mode searches `isbn:<term>` one line at a time.

pub mod google;
pub mod isbndb;

mod error;
mod traits;

pub use error::ProviderError;
pub use google::GoogleProvider;
pub use isbndb::{IsbndbConfig, IsbndbProvider};
pub use traits::{BookProvider, SearchMode, SearchPage};
