//! SQLite interaction log implementation.

use sqlx::Row;

use mendr_core::repository::InteractionLogRepository;
use mendr_types::error::RepositoryError;
use mendr_types::healing::InteractionLogEntry;

use super::pool::DatabasePool;
use super::{format_datetime, map_sqlx_error, parse_datetime, parse_id};

/// SQLite-backed append-only log of `ask` calls.
pub struct SqliteInteractionLog {
    pool: DatabasePool,
}

impl SqliteInteractionLog {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl InteractionLogRepository for SqliteInteractionLog {
    async fn append(&self, entry: &InteractionLogEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO interaction_logs
                   (id, query, response, confidence, healing_attempts, success, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(entry.id.to_string())
        .bind(&entry.query)
        .bind(&entry.response)
        .bind(entry.confidence)
        .bind(i64::from(entry.healing_attempts))
        .bind(entry.success)
        .bind(format_datetime(&entry.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<InteractionLogEntry>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM interaction_logs ORDER BY rowid DESC LIMIT ?")
            .bind(limit.max(0))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                InteractionRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_entry()
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Private Row types
// ---------------------------------------------------------------------------

struct InteractionRow {
    id: String,
    query: String,
    response: String,
    confidence: f64,
    healing_attempts: i64,
    success: bool,
    created_at: String,
}

impl InteractionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            query: row.try_get("query")?,
            response: row.try_get("response")?,
            confidence: row.try_get("confidence")?,
            healing_attempts: row.try_get("healing_attempts")?,
            success: row.try_get("success")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_entry(self) -> Result<InteractionLogEntry, RepositoryError> {
        let healing_attempts = u32::try_from(self.healing_attempts)
            .map_err(|e| RepositoryError::Query(format!("invalid healing_attempts: {e}")))?;

        Ok(InteractionLogEntry {
            id: parse_id(&self.id)?,
            query: self.query,
            response: self.response,
            confidence: self.confidence,
            healing_attempts,
            success: self.success,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_pool;
    use mendr_types::healing::HealingResult;

    fn entry(query: &str, attempts: u32, success: bool) -> InteractionLogEntry {
        let result = HealingResult {
            answer: format!("answer to {query}"),
            healing_attempts: attempts,
            confidence: if success { 1.0 - f64::from(attempts) / 3.0 } else { 0.0 },
            duration_seconds: 0.12,
        };
        InteractionLogEntry::from_result(query, &result, success)
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let log = SqliteInteractionLog::new(test_pool().await);
        let original = entry("What is Rust?", 1, true);

        log.append(&original).await.unwrap();
        let rows = log.recent(10).await.unwrap();

        assert_eq!(rows.len(), 1);
        let stored = &rows[0];
        assert_eq!(stored.id, original.id);
        assert_eq!(stored.query, "What is Rust?");
        assert_eq!(stored.response, "answer to What is Rust?");
        assert_eq!(stored.healing_attempts, 1);
        assert!(stored.success);
        assert!((stored.confidence - original.confidence).abs() < 1e-9);
        assert_eq!(format_datetime(&stored.created_at), format_datetime(&original.created_at));
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let log = SqliteInteractionLog::new(test_pool().await);
        for i in 0..5 {
            log.append(&entry(&format!("q{i}"), 2, false)).await.unwrap();
        }

        let rows = log.recent(3).await.unwrap();
        let queries: Vec<&str> = rows.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["q4", "q3", "q2"]);
        assert!(rows.iter().all(|r| !r.success && r.confidence == 0.0));
    }

    #[tokio::test]
    async fn test_recent_on_empty_log() {
        let log = SqliteInteractionLog::new(test_pool().await);
        assert!(log.recent(10).await.unwrap().is_empty());
    }
}
