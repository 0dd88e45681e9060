//! Persistent set of fully downloaded work IDs.

use sqlx::Row;
use tracing::instrument;

use super::Result;
use crate::db::Database;

/// Dedup store over the `downloaded_ids` table.
///
/// A work ID enters the store only after a fully successful download, and is
/// never removed by the pipeline. Membership is consulted before every
/// download attempt.
#[derive(Debug, Clone)]
pub struct IdStore {
    db: Database,
}

impl IdStore {
    /// Creates a store over the given database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Tests whether `work_id` has a completed download on record.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn contains(&self, work_id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM downloaded_ids WHERE work_id = ?")
            .bind(work_id)
            .fetch_one(self.db.pool())
            .await?;
        let count: i64 = row.get("n");
        Ok(count > 0)
    }

    /// Records `work_id` as fully downloaded. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::Database`] if the insert fails.
    #[instrument(skip(self))]
    pub async fn add(&self, work_id: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO downloaded_ids (work_id) VALUES (?)")
            .bind(work_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }
}
