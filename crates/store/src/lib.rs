//! Shelf - Store
//!
//! MySQL persistence for the ingestion pipeline: schema bootstrap, the book
//! catalog with its in-memory dedup caches, and the progress journal.
//!
//! Two databases are involved: the books database (catalog plus dimension
//! tables) and the progress database (completed terms). Each gets its own
//! pool. The dedup caches are loaded once at startup and are the price of
//! O(1) duplicate checks without per-book round trips.

mod catalog;
mod connect;
mod dedup;
mod error;
mod journal;
mod schema;

pub use catalog::Catalog;
pub use connect::MysqlSettings;
pub use dedup::{Dimension, DimensionCache, SavedKeys};
pub use error::{Result, StoreError};
pub use journal::{Journal, completed_terms_count};
pub use schema::{create_book_tables, create_progress_tables};
