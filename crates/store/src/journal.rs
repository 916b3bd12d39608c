//! Progress journal
//!
//! An append-only `completed_terms` table in the progress database plus an
//! in-memory set of its rows. A term goes in only after its last page is
//! durably in the books store; on restart the set is reloaded and the feeder
//! skips everything in it.

use std::collections::HashSet;

use async_trait::async_trait;
use shelf_pipeline::{PipelineError, TermJournal};
use sqlx::{MySqlPool, Row};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::Result;

/// The completed-terms journal.
pub struct Journal {
    pool: MySqlPool,
    terms: RwLock<HashSet<String>>,
}

impl Journal {
    /// Load the completed set from the progress database.
    pub async fn open(pool: MySqlPool) -> Result<Self> {
        let rows = sqlx::query("SELECT term FROM completed_terms")
            .fetch_all(&pool)
            .await?;

        let mut terms = HashSet::with_capacity(rows.len());
        for row in rows {
            if let Some(term) = row.try_get::<Option<String>, _>(0)? {
                terms.insert(term);
            }
        }

        info!(completed_terms = terms.len(), "progress journal loaded");
        Ok(Self::with_terms(pool, terms))
    }

    fn with_terms(pool: MySqlPool, terms: HashSet<String>) -> Self {
        Self {
            pool,
            terms: RwLock::new(terms),
        }
    }

    /// Number of completed terms.
    pub async fn len(&self) -> usize {
        self.terms.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn record(&self, term: &str) -> Result<()> {
        // The write lock spans the membership check and the INSERT, so a term
        // completed by several batches lands in the table exactly once.
        let mut terms = self.terms.write().await;
        if terms.contains(term) {
            return Ok(());
        }

        sqlx::query("INSERT INTO completed_terms (term) VALUES (?)")
            .bind(term)
            .execute(&self.pool)
            .await?;
        terms.insert(term.to_owned());

        Ok(())
    }
}

#[async_trait]
impl TermJournal for Journal {
    async fn is_complete(&self, term: &str) -> bool {
        self.terms.read().await.contains(term)
    }

    async fn mark_complete(&self, term: &str) -> std::result::Result<(), PipelineError> {
        self.record(term).await.map_err(PipelineError::store)
    }
}

/// Completed-term count straight from the table, for the status command.
pub async fn completed_terms_count(pool: &MySqlPool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM completed_terms")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
