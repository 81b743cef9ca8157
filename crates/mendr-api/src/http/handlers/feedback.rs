//! `/feedback`: record a verdict on an earlier answer, or list recent ones.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use mendr_core::repository::FeedbackRepository;
use mendr_types::feedback::FeedbackEntry;

use crate::http::error::AppError;
use crate::http::handlers::LimitQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub query: String,
    pub original_response: String,
    /// `thumbs_up` or `thumbs_down`.
    pub feedback: String,
    #[serde(default)]
    pub corrected_answer: Option<String>,
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = payload?;
    let outcome = state
        .feedback_service
        .record_feedback(
            &body.query,
            &body.original_response,
            &body.feedback,
            body.corrected_answer.as_deref(),
        )
        .await?;

    tracing::debug!(memory_added = outcome.memory_added, "Feedback handled");

    Ok(Json(json!({
        "status": "success",
        "message": "Thank you for your feedback!",
    })))
}

/// `GET /feedback`: newest first; empty when the service runs without a database.
pub async fn list_feedback(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<FeedbackEntry>>, AppError> {
    let limit = params.checked()?;
    let entries = state.feedback_service.repository().recent(limit).await?;
    Ok(Json(entries))
}
