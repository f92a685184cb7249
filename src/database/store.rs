use rand::Rng;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use super::models::{NewProverb, Proverb};

/// Errors surfaced by [`ProverbStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A random read was attempted with zero stored entries.
    #[error("no proverbs stored")]
    Empty,
    /// The persistence layer failed; no partial writes are left visible.
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Durable proverb storage with by-id, by-hash, and uniform random read
/// paths.
#[derive(Clone)]
pub struct ProverbStore {
    pool: SqlitePool,
}

impl ProverbStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Appends all given entries in one transaction, all-or-nothing.
    pub async fn add(&self, entries: &[NewProverb]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for entry in entries {
            entry.insert(&mut tx).await?;
        }
        tx.commit().await?;
        debug!("stored {} proverbs", entries.len());
        Ok(())
    }

    /// A missing id is a valid empty result, not an error.
    pub async fn get(&self, id: i64) -> Result<Option<Proverb>, StoreError> {
        Ok(Proverb::find_by_id(&self.pool, id).await?)
    }

    /// Looks an entry up by its content digest.
    pub async fn get_by_hash(&self, hash: &str) -> Result<Option<Proverb>, StoreError> {
        Ok(Proverb::find_by_hash(&self.pool, hash).await?)
    }

    /// Returns one entry chosen uniformly over all stored entries.
    ///
    /// Selection is count-then-offset, so the distribution stays uniform
    /// even when ids have been deleted from the middle of the range.
    pub async fn get_random(&self) -> Result<Proverb, StoreError> {
        let count = Proverb::count(&self.pool).await?;
        if count == 0 {
            return Err(StoreError::Empty);
        }
        let offset = rand::thread_rng().gen_range(0..count);
        // a row removed between the two queries surfaces as Empty
        Proverb::nth(&self.pool, offset)
            .await?
            .ok_or(StoreError::Empty)
    }

    /// Destroys all entries and replaces them with `entries`, resetting
    /// id assignment to start from 1.
    ///
    /// Best-effort: the wipe and the reload are separate steps; a reload
    /// failure leaves an empty store.
    pub async fn wipe_and_reload(&self, entries: &[NewProverb]) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM proverbs").execute(&self.pool).await?;
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'proverbs'")
            .execute(&self.pool)
            .await?;
        self.add(entries).await
    }

    pub async fn all(&self) -> Result<Vec<Proverb>, StoreError> {
        Ok(Proverb::all(&self.pool).await?)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        Ok(Proverb::count(&self.pool).await?)
    }

    pub async fn max_id(&self) -> Result<i64, StoreError> {
        Ok(Proverb::max_id(&self.pool).await?)
    }
}
