//! Healing loop result and interaction log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a single `ask` call.
///
/// Serialized as-is for the `/ask` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealingResult {
    pub answer: String,
    /// Escalations consumed beyond the initial plain attempt (0..=2).
    pub healing_attempts: u32,
    /// Heuristic score in [0.0, 1.0]; 0.0 when every attempt failed.
    pub confidence: f64,
    /// Wall-clock time of the whole call, rounded to two decimals.
    pub duration_seconds: f64,
}

impl HealingResult {
    /// Whether the answer passed the quality check.
    ///
    /// Exhausted calls always report zero confidence.
    pub fn succeeded(&self) -> bool {
        self.confidence > 0.0
    }
}

/// One row of the append-only interaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionLogEntry {
    pub id: Uuid,
    pub query: String,
    pub response: String,
    pub confidence: f64,
    pub healing_attempts: u32,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}

impl InteractionLogEntry {
    /// Build a log entry from a finished healing result.
    pub fn from_result(query: &str, result: &HealingResult, success: bool) -> Self {
        Self {
            id: Uuid::now_v7(),
            query: query.to_string(),
            response: result.answer.clone(),
            confidence: result.confidence,
            healing_attempts: result.healing_attempts,
            success,
            created_at: Utc::now(),
        }
    }
}
