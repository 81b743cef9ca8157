//! SQLite feedback store implementation.

use sqlx::Row;

use mendr_core::repository::FeedbackRepository;
use mendr_types::error::{FeedbackError, RepositoryError};
use mendr_types::feedback::{FeedbackEntry, FeedbackType};

use super::pool::DatabasePool;
use super::{format_datetime, map_sqlx_error, parse_datetime, parse_id};

/// SQLite-backed append-only store of user feedback.
pub struct SqliteFeedbackStore {
    pool: DatabasePool,
}

impl SqliteFeedbackStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl FeedbackRepository for SqliteFeedbackStore {
    async fn append(&self, entry: &FeedbackEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO user_feedback
                   (id, query, original_response, feedback, corrected_answer, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(entry.id.to_string())
        .bind(&entry.query)
        .bind(&entry.original_response)
        .bind(entry.feedback.to_string())
        .bind(&entry.corrected_answer)
        .bind(format_datetime(&entry.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<FeedbackEntry>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM user_feedback ORDER BY rowid DESC LIMIT ?")
            .bind(limit.max(0))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let feedback_row =
                FeedbackRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            entries.push(feedback_row.into_entry()?);
        }
        Ok(entries)
    }
}

// ---------------------------------------------------------------------------
// Private Row types
// ---------------------------------------------------------------------------

struct FeedbackRow {
    id: String,
    query: String,
    original_response: String,
    feedback: String,
    corrected_answer: Option<String>,
    created_at: String,
}

impl FeedbackRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            query: row.try_get("query")?,
            original_response: row.try_get("original_response")?,
            feedback: row.try_get("feedback")?,
            corrected_answer: row.try_get("corrected_answer")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_entry(self) -> Result<FeedbackEntry, RepositoryError> {
        let feedback: FeedbackType = self
            .feedback
            .parse()
            .map_err(|e: FeedbackError| RepositoryError::Query(e.to_string()))?;

        Ok(FeedbackEntry {
            id: parse_id(&self.id)?,
            query: self.query,
            original_response: self.original_response,
            feedback,
            corrected_answer: self.corrected_answer,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}
