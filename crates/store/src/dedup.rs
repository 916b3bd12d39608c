//! In-memory dedup state
//!
//! Five independently locked maps: the saved natural-key set and one name→id
//! cache per dimension table. There is no global lock.
//!
//! Lock discipline: [`SavedKeys`] uses a synchronous `RwLock` and is never
//! held across an await. Each [`DimensionCache`] uses an async mutex that is
//! deliberately held across its INSERT, so a name is looked up, inserted and
//! cached as one critical section and the table's UNIQUE column never sees a
//! racing second insert.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use sqlx::MySqlPool;
use tokio::sync::Mutex;

use crate::error::Result;

/// The four dimension tables referenced by books.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Publisher,
    Language,
    Author,
    Subject,
}

impl Dimension {
    /// Table name; also used in log fields.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Publisher => "publishers",
            Self::Language => "languages",
            Self::Author => "authors",
            Self::Subject => "subjects",
        }
    }
}

/// Natural keys of every book already in the store, plus keys reserved by an
/// in-flight writer.
#[derive(Debug, Default)]
pub struct SavedKeys {
    keys: RwLock<HashSet<String>>,
}

impl SavedKeys {
    pub fn new(keys: HashSet<String>) -> Self {
        Self {
            keys: RwLock::new(keys),
        }
    }

    /// Atomically test-and-insert a key. Returns true when the key was new,
    /// meaning the caller now owns the insert for this book. This is the
    /// dedup gate and runs before any SQL.
    pub fn reserve(&self, key: &str) -> bool {
        let mut keys = self.keys.write().expect("saved-keys lock poisoned");
        keys.insert(key.to_owned())
    }

    /// Read-only membership check.
    pub fn contains(&self, key: &str) -> bool {
        let keys = self.keys.read().expect("saved-keys lock poisoned");
        keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.read().expect("saved-keys lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Name → surrogate id cache for one dimension table.
#[derive(Debug)]
pub struct DimensionCache {
    dimension: Dimension,
    ids: Mutex<HashMap<String, u64>>,
}

impl DimensionCache {
    pub fn new(dimension: Dimension, initial: HashMap<String, u64>) -> Self {
        Self {
            dimension,
            ids: Mutex::new(initial),
        }
    }

    /// Resolve a normalized name to its surrogate id, inserting the row on
    /// first sight. The lock spans lookup, INSERT and cache update.
    pub async fn resolve(&self, pool: &MySqlPool, name: &str) -> Result<u64> {
        let mut ids = self.ids.lock().await;
        if let Some(id) = ids.get(name) {
            return Ok(*id);
        }

        let statement = format!("INSERT INTO {} (name) VALUES (?)", self.dimension.table());
        let id = sqlx::query(&statement)
            .bind(name)
            .execute(pool)
            .await?
            .last_insert_id();
        ids.insert(name.to_owned(), id);

        Ok(id)
    }

    /// Number of cached names.
    pub async fn len(&self) -> usize {
        self.ids.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};

    use super::*;

    /// Pool that never connects; any SQL would error out.
    fn lazy_pool() -> MySqlPool {
        MySqlPoolOptions::new().connect_lazy_with(MySqlConnectOptions::new())
    }

    #[test]
    fn reserve_is_first_wins() {
        let keys = SavedKeys::default();
        assert!(keys.reserve("9781593278281"));
        assert!(!keys.reserve("9781593278281"));
        assert!(keys.contains("9781593278281"));
    }

    #[test]
    fn preloaded_keys_are_reserved() {
        let keys = SavedKeys::new(HashSet::from(["k".to_string()]));
        assert!(!keys.reserve("k"));
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn concurrent_reserve_admits_exactly_one() {
        let keys = Arc::new(SavedKeys::default());
        let winners: usize = std::thread::scope(|s| {
            (0..8)
                .map(|_| {
                    let keys = Arc::clone(&keys);
                    s.spawn(move || keys.reserve("same-key") as usize)
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|h| h.join().unwrap())
                .sum()
        });
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn dimension_cache_hit_skips_sql() {
        let cache = DimensionCache::new(
            Dimension::Publisher,
            HashMap::from([("Penguin".to_string(), 7u64)]),
        );
        // The lazy pool has no server behind it; a cache hit must not touch it.
        let id = cache.resolve(&lazy_pool(), "Penguin").await.unwrap();
        assert_eq!(id, 7);
    }

    #[tokio::test]
    async fn dimension_cache_miss_requires_the_database() {
        let cache = DimensionCache::new(Dimension::Author, HashMap::new());
        let result = cache.resolve(&lazy_pool(), "New Author").await;
        assert!(result.is_err(), "miss path must attempt the INSERT");
        assert_eq!(cache.len().await, 0, "failed insert is not cached");
    }
}
