//! Interaction log repository trait definition.

use std::future::Future;

use mendr_types::error::RepositoryError;
use mendr_types::healing::InteractionLogEntry;

/// Append-only record of every `ask` call and its outcome.
///
/// Implementations live in mendr-infra (e.g., SqliteInteractionLog).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait InteractionLogRepository: Send + Sync {
    /// Append one entry.
    fn append(
        &self,
        entry: &InteractionLogEntry,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// The most recent `limit` entries, newest first.
    fn recent(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<InteractionLogEntry>, RepositoryError>> + Send;
}

/// `None` stands for "no live connection": appends are dropped and reads are
/// empty.
impl<R: InteractionLogRepository> InteractionLogRepository for Option<R> {
    async fn append(&self, entry: &InteractionLogEntry) -> Result<(), RepositoryError> {
        match self {
            Some(repo) => repo.append(entry).await,
            None => Ok(()),
        }
    }

    async fn recent(&self, limit: i64) -> Result<Vec<InteractionLogEntry>, RepositoryError> {
        match self {
            Some(repo) => repo.recent(limit).await,
            None => Ok(Vec::new()),
        }
    }
}
