//! `GET /interactions`: most recent interaction log entries, newest first.

use axum::extract::{Query, State};
use axum::Json;

use mendr_core::repository::InteractionLogRepository;
use mendr_types::healing::InteractionLogEntry;

use crate::http::error::AppError;
use crate::http::handlers::LimitQuery;
use crate::state::AppState;

/// Empty when the service runs without a database.
pub async fn list_interactions(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<InteractionLogEntry>>, AppError> {
    let limit = params.checked()?;
    let entries = state.orchestrator.interaction_log().recent(limit).await?;
    Ok(Json(entries))
}
