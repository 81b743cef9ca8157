//! Request handlers, one module per resource.

pub mod ask;
pub mod feedback;
pub mod interactions;
pub mod memory;

use axum::Json;
use serde::Deserialize;
use serde_json::json;

use mendr_core::repository::DEFAULT_RECENT_LIMIT;

use crate::http::error::AppError;

/// Upper bound on `limit` for one listing request.
const MAX_LIMIT: i64 = 500;

/// `?limit=N` on the log listings; defaults to 50, accepts 1..=500.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

impl LimitQuery {
    pub fn checked(&self) -> Result<i64, AppError> {
        let limit = self.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(limit)
    }
}

/// Root welcome message.
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Welcome to the Self-Healing AI API",
    }))
}

/// Liveness check.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
