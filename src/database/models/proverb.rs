use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::hash::compute_hash;

const SELECT_COLUMNS: &str = "id, hash, proverb, meaning, examples, created_at";

/// A stored proverb row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Proverb {
    pub id: i64,
    pub hash: String,
    pub proverb: String,
    pub meaning: String,
    pub examples: Option<String>,
    pub created_at: String,
}

/// A proverb ready to be inserted. The hash is always derived from the
/// proverb text, never supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProverb {
    pub hash: String,
    pub proverb: String,
    pub meaning: String,
    pub examples: Option<String>,
}

impl NewProverb {
    pub fn new(
        proverb: impl Into<String>,
        meaning: impl Into<String>,
        examples: Option<String>,
    ) -> Self {
        let proverb = proverb.into();
        Self {
            hash: compute_hash(&proverb),
            proverb,
            meaning: meaning.into(),
            examples,
        }
    }

    pub(crate) async fn insert(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    ) -> Result<(), sqlx::Error> {
        let created_at = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO proverbs (hash, proverb, meaning, examples, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&self.hash)
        .bind(&self.proverb)
        .bind(&self.meaning)
        .bind(&self.examples)
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;
        Ok(())
    }
}

impl Proverb {
    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Proverb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM proverbs WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_hash(
        pool: &sqlx::SqlitePool,
        hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Proverb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM proverbs WHERE hash = ? ORDER BY id LIMIT 1"
        ))
        .bind(hash)
        .fetch_optional(pool)
        .await
    }

    /// Row at `offset` in id order; used for uniform random selection.
    pub async fn nth(
        pool: &sqlx::SqlitePool,
        offset: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Proverb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM proverbs ORDER BY id LIMIT 1 OFFSET ?"
        ))
        .bind(offset)
        .fetch_optional(pool)
        .await
    }

    pub async fn all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Proverb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM proverbs ORDER BY id"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM proverbs")
            .fetch_one(pool)
            .await
    }

    pub async fn max_id(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(id), 0) FROM proverbs")
            .fetch_one(pool)
            .await
    }
}
