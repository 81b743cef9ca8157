//! `GET /memories`: dump the in-process memory table.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn list_memories(State(state): State<AppState>) -> Json<serde_json::Value> {
    let memories = state.memory.records().await;
    Json(json!({
        "count": memories.len(),
        "memories": memories,
    }))
}
