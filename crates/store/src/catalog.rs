//! Book catalog
//!
//! Owns the books pool and the dedup state, and persists one book at a time:
//! reserve the natural key in memory, resolve the dimension rows, insert the
//! book row, then the child rows. The reserve runs before any SQL so two
//! writers racing on the same key cannot both insert.
//!
//! No transaction wraps a book and its children. A crash in between leaves a
//! book short of some child rows; the process exits on any SQL error and a
//! restart re-reads the tables, so the partial book is simply skipped from
//! then on.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use shelf_pipeline::{BookStore, PersistOutcome, PipelineError};
use shelf_protocol::{Book, normalize_name, normalize_synopsis};
use sqlx::{MySqlPool, Row};
use tracing::info;

use crate::dedup::{Dimension, DimensionCache, SavedKeys};
use crate::error::Result;

/// The books database with its in-memory dedup caches.
pub struct Catalog {
    pool: MySqlPool,
    saved: SavedKeys,
    publishers: DimensionCache,
    languages: DimensionCache,
    authors: DimensionCache,
    subjects: DimensionCache,
}

impl Catalog {
    /// Load the dedup caches from the database and wrap the pool.
    ///
    /// This reads every natural key and every dimension row. On a catalog
    /// with millions of books this is the single largest memory consumer;
    /// it is the price of O(1) dedup checks without per-query round trips.
    pub async fn open(pool: MySqlPool) -> Result<Self> {
        let saved = load_keys(&pool).await?;
        let publishers = load_dimension(&pool, Dimension::Publisher).await?;
        let languages = load_dimension(&pool, Dimension::Language).await?;
        let authors = load_dimension(&pool, Dimension::Author).await?;
        let subjects = load_dimension(&pool, Dimension::Subject).await?;

        info!(
            books = saved.len(),
            publishers = publishers.len(),
            languages = languages.len(),
            authors = authors.len(),
            subjects = subjects.len(),
            "dedup caches loaded"
        );

        Ok(Self::with_caches(
            pool, saved, publishers, languages, authors, subjects,
        ))
    }

    fn with_caches(
        pool: MySqlPool,
        saved: HashSet<String>,
        publishers: HashMap<String, u64>,
        languages: HashMap<String, u64>,
        authors: HashMap<String, u64>,
        subjects: HashMap<String, u64>,
    ) -> Self {
        Self {
            pool,
            saved: SavedKeys::new(saved),
            publishers: DimensionCache::new(Dimension::Publisher, publishers),
            languages: DimensionCache::new(Dimension::Language, languages),
            authors: DimensionCache::new(Dimension::Author, authors),
            subjects: DimensionCache::new(Dimension::Subject, subjects),
        }
    }

    /// Number of known natural keys (persisted plus reserved).
    pub fn known_books(&self) -> usize {
        self.saved.len()
    }

    async fn persist_book(&self, book: &Book) -> Result<PersistOutcome> {
        let key = normalize_name(&book.natural_key);

        // Dedup gate: in memory, before any SQL.
        if !self.saved.reserve(&key) {
            return Ok(PersistOutcome::Duplicate);
        }

        let publisher_id = self
            .publishers
            .resolve(&self.pool, &normalize_name(&book.publisher))
            .await?;
        let language_id = self
            .languages
            .resolve(&self.pool, &normalize_name(&book.language))
            .await?;

        let book_id = self.insert_book(book, &key, publisher_id, language_id).await?;

        for author in &book.authors {
            let author_id = self
                .authors
                .resolve(&self.pool, &normalize_name(author))
                .await?;
            sqlx::query("INSERT INTO author_book (author_id, book_id) VALUES (?, ?)")
                .bind(author_id)
                .bind(book_id)
                .execute(&self.pool)
                .await?;
        }

        for subject in &book.subjects {
            let subject_id = self
                .subjects
                .resolve(&self.pool, &normalize_name(subject))
                .await?;
            sqlx::query("INSERT INTO book_subject (book_id, subject_id) VALUES (?, ?)")
                .bind(book_id)
                .bind(subject_id)
                .execute(&self.pool)
                .await?;
        }

        for review in &book.reviews {
            sqlx::query("INSERT INTO reviews (text, book_id) VALUES (?, ?)")
                .bind(review)
                .bind(book_id)
                .execute(&self.pool)
                .await?;
        }

        for other in &book.other_isbns {
            sqlx::query("INSERT INTO other_isbns (isbn, binding, book_id) VALUES (?, ?, ?)")
                .bind(&other.isbn)
                .bind(&other.binding)
                .bind(book_id)
                .execute(&self.pool)
                .await?;
        }

        for identifier in &book.industry_identifiers {
            sqlx::query(
                "INSERT INTO industry_identifiers (type, identifier, book_id) VALUES (?, ?, ?)",
            )
            .bind(&identifier.kind)
            .bind(&identifier.identifier)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        }

        Ok(PersistOutcome::Saved)
    }

    async fn insert_book(
        &self,
        book: &Book,
        key: &str,
        publisher_id: u64,
        language_id: u64,
    ) -> Result<u64> {
        let result = sqlx::query(
            "INSERT INTO books (
                natural_key,
                title,
                title_long,
                isbn10,
                isbn13,
                dewey_decimal,
                binding,
                publisher_id,
                language_id,
                date_published,
                edition,
                pages,
                dimensions,
                overview,
                image,
                msrp,
                excerpt,
                synopsis,
                related_type
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(key)
        .bind(&book.title)
        .bind(&book.title_long)
        .bind(&book.isbn10)
        .bind(&book.isbn13)
        .bind(&book.dewey_decimal)
        .bind(&book.binding)
        .bind(publisher_id)
        .bind(language_id)
        .bind(&book.date_published)
        .bind(&book.edition)
        .bind(book.pages)
        .bind(&book.dimensions)
        .bind(&book.overview)
        .bind(&book.image)
        .bind(&book.msrp)
        .bind(&book.excerpt)
        .bind(normalize_synopsis(&book.synopsis))
        .bind(&book.related_type)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }
}

#[async_trait]
impl BookStore for Catalog {
    async fn persist(&self, book: &Book) -> std::result::Result<PersistOutcome, PipelineError> {
        self.persist_book(book).await.map_err(PipelineError::store)
    }
}

async fn load_keys(pool: &MySqlPool) -> Result<HashSet<String>> {
    let rows = sqlx::query("SELECT natural_key FROM books")
        .fetch_all(pool)
        .await?;

    let mut keys = HashSet::with_capacity(rows.len());
    for row in rows {
        if let Some(key) = row.try_get::<Option<String>, _>(0)? {
            keys.insert(key);
        }
    }
    Ok(keys)
}

async fn load_dimension(pool: &MySqlPool, dimension: Dimension) -> Result<HashMap<String, u64>> {
    let statement = format!("SELECT id, name FROM {}", dimension.table());
    let rows = sqlx::query(&statement).fetch_all(pool).await?;

    let mut ids = HashMap::with_capacity(rows.len());
    for row in rows {
        let id: u64 = row.try_get(0)?;
        if let Some(name) = row.try_get::<Option<String>, _>(1)? {
            ids.insert(name, id);
        }
    }
    Ok(ids)
}
