//! Feedback repository trait definition.

use mendr_types::error::RepositoryError;
use mendr_types::feedback::FeedbackEntry;

/// Append-only store of explicit user feedback.
///
/// Implementations live in mendr-infra (e.g., SqliteFeedbackStore).
pub trait FeedbackRepository: Send + Sync {
    /// Append one entry.
    fn append(
        &self,
        entry: &FeedbackEntry,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The most recent `limit` entries, newest first.
    fn recent(
        &self,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<FeedbackEntry>, RepositoryError>> + Send;
}

/// `None` is a no-op store, used when persistence is disabled or unreachable.
impl<R: FeedbackRepository> FeedbackRepository for Option<R> {
    async fn append(&self, entry: &FeedbackEntry) -> Result<(), RepositoryError> {
        match self {
            Some(repo) => repo.append(entry).await,
            None => Ok(()),
        }
    }

    async fn recent(&self, limit: i64) -> Result<Vec<FeedbackEntry>, RepositoryError> {
        match self {
            Some(repo) => repo.recent(limit).await,
            None => Ok(Vec::new()),
        }
    }
}
