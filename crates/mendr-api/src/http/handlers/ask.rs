//! `POST /ask`: answer a question through the healing loop.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Deserialize;

use mendr_types::healing::HealingResult;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

/// Blank queries are rejected; everything else gets a `HealingResult`,
/// including the exhaustion answer when no attempt succeeds.
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<HealingResult>, AppError> {
    let Json(body) = payload?;
    if body.query.trim().is_empty() {
        return Err(AppError::Validation("query must not be empty".to_string()));
    }

    let result = state.orchestrator.ask(&body.query).await;
    Ok(Json(result))
}
