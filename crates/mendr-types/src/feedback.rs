//! User feedback types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::FeedbackError;

/// Verdict a user gives on an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    ThumbsUp,
    ThumbsDown,
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackType::ThumbsUp => write!(f, "thumbs_up"),
            FeedbackType::ThumbsDown => write!(f, "thumbs_down"),
        }
    }
}

impl FromStr for FeedbackType {
    type Err = FeedbackError;

    /// Exact match only: `thumbs_up` or `thumbs_down`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thumbs_up" => Ok(FeedbackType::ThumbsUp),
            "thumbs_down" => Ok(FeedbackType::ThumbsDown),
            other => Err(FeedbackError::InvalidFeedbackType(other.to_string())),
        }
    }
}

/// One row of the append-only feedback store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: Uuid,
    pub query: String,
    pub original_response: String,
    pub feedback: FeedbackType,
    pub corrected_answer: Option<String>,
    pub created_at: DateTime<Utc>,
}
