//! Append-only writer for processed-work records.

use tracing::instrument;

use super::Result;
use crate::db::Database;
use crate::record::Record;

/// Appends one row per processed work to the `works` table.
///
/// The writer performs no deduplication; the same work processed twice
/// yields two rows, each with its own collection timestamp.
#[derive(Debug, Clone)]
pub struct RecordWriter {
    db: Database,
}

impl RecordWriter {
    /// Creates a writer over the given database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Appends `record`. The address list is stored space-joined; an empty
    /// list is stored as an empty string, never NULL.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::Database`] if the insert fails.
    #[instrument(skip(self, record), fields(work_id = %record.work_id))]
    pub async fn append(&self, record: &Record) -> Result<()> {
        sqlx::query(
            "INSERT INTO works (work_id, kind, author_id, author_name, title, \
             publish_time, download_urls, collected_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.work_id)
        .bind(record.kind.as_str())
        .bind(&record.author_id)
        .bind(&record.author_name)
        .bind(&record.title)
        .bind(&record.publish_time)
        .bind(record.joined_urls())
        .bind(&record.collected_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Number of appended rows; used by tests and the CLI summary.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::Database`] if the query fails.
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM works")
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::WorkKind;
    use sqlx::Row;

    fn sample_record() -> Record {
        Record {
            work_id: "abc123".to_string(),
            kind: WorkKind::Video,
            author_id: "u1".to_string(),
            author_name: "rider".to_string(),
            title: "Sunset ride".to_string(),
            publish_time: "2023-11-14 22:13:20".to_string(),
            download_urls: vec!["https://a/1".to_string(), "https://a/2".to_string()],
            collected_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_stores_joined_urls() {
        let db = Database::new_in_memory().await.unwrap();
        let writer = RecordWriter::new(db.clone());
        writer.append(&sample_record()).await.unwrap();

        let row = sqlx::query("SELECT download_urls, kind FROM works")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let urls: String = row.get("download_urls");
        let kind: String = row.get("kind");
        assert_eq!(urls, "https://a/1 https://a/2");
        assert_eq!(kind, "video");
    }

    #[tokio::test]
    async fn test_append_empty_urls_stores_empty_string() {
        let db = Database::new_in_memory().await.unwrap();
        let writer = RecordWriter::new(db.clone());
        let record = Record {
            download_urls: Vec::new(),
            ..sample_record()
        };
        writer.append(&record).await.unwrap();

        let row = sqlx::query("SELECT download_urls FROM works")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let urls: Option<String> = row.get("download_urls");
        assert_eq!(urls.as_deref(), Some(""), "empty list must render as ''");
    }

    #[tokio::test]
    async fn test_append_never_deduplicates() {
        let db = Database::new_in_memory().await.unwrap();
        let writer = RecordWriter::new(db);
        writer.append(&sample_record()).await.unwrap();
        writer.append(&sample_record()).await.unwrap();
        assert_eq!(writer.count().await.unwrap(), 2);
    }
}
