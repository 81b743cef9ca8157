//! SQLite persistence for the interaction and feedback logs.

pub mod feedback;
pub mod interaction;
pub mod pool;

pub use feedback::SqliteFeedbackStore;
pub use interaction::SqliteInteractionLog;
pub use pool::DatabasePool;

use chrono::{DateTime, SecondsFormat, Utc};

use mendr_types::error::RepositoryError;

/// Pool and I/O failures mean the database is unreachable; the rest are query errors.
pub(crate) fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

/// Fixed-width RFC 3339 so stored timestamps sort as text.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn parse_id(s: &str) -> Result<uuid::Uuid, RepositoryError> {
    uuid::Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid id: {e}")))
}

#[cfg(test)]
pub(crate) async fn test_pool() -> DatabasePool {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
    std::mem::forget(dir);
    DatabasePool::new(&url).await.unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_failures_map_to_connection() {
        assert!(matches!(map_sqlx_error(sqlx::Error::PoolClosed), RepositoryError::Connection));
        assert!(matches!(map_sqlx_error(sqlx::Error::PoolTimedOut), RepositoryError::Connection));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            RepositoryError::Query(_)
        ));
    }
}
