//! FeedbackService -- records user verdicts and learns from corrections.
//!
//! A `thumbs_up` carrying a non-blank corrected answer is the only runtime
//! write path into memory. The service receives the memory store at
//! construction; nothing is looked up globally.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use mendr_types::error::FeedbackError;
use mendr_types::feedback::{FeedbackEntry, FeedbackType};
use mendr_types::memory::correction_memory_text;

use crate::memory::vector::VectorMemory;
use crate::repository::FeedbackRepository;

/// What recording one piece of feedback changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackOutcome {
    pub feedback: FeedbackType,
    /// Whether a correction memory was stored.
    pub memory_added: bool,
}

/// Appends feedback entries and feeds corrections back into memory.
pub struct FeedbackService<F: FeedbackRepository> {
    repo: F,
    memory: Arc<VectorMemory>,
}

impl<F: FeedbackRepository> FeedbackService<F> {
    pub fn new(repo: F, memory: Arc<VectorMemory>) -> Self {
        Self { repo, memory }
    }

    pub fn repository(&self) -> &F {
        &self.repo
    }

    /// Validate and record one verdict.
    ///
    /// `feedback_type` must be exactly `thumbs_up` or `thumbs_down`; anything
    /// else is rejected before any write. Store failures are logged and do not
    /// fail the call.
    pub async fn record_feedback(
        &self,
        query: &str,
        original_response: &str,
        feedback_type: &str,
        corrected_answer: Option<&str>,
    ) -> Result<FeedbackOutcome, FeedbackError> {
        let feedback: FeedbackType = feedback_type.parse()?;

        let entry = FeedbackEntry {
            id: Uuid::now_v7(),
            query: query.to_string(),
            original_response: original_response.to_string(),
            feedback,
            corrected_answer: corrected_answer.map(str::to_string),
            created_at: Utc::now(),
        };
        if let Err(e) = self.repo.append(&entry).await {
            warn!(error = %e, "Failed to write feedback");
        }
        info!(feedback = %feedback, "Feedback recorded");

        let correction = corrected_answer.map(str::trim).filter(|c| !c.is_empty());
        let memory_added = match (feedback, correction) {
            (FeedbackType::ThumbsUp, Some(corrected)) => {
                let text = correction_memory_text(query, corrected);
                self.memory.add_memory(&text).await
            }
            _ => false,
        };

        Ok(FeedbackOutcome {
            feedback,
            memory_added,
        })
    }
}
