//! Axum router configuration with middleware.
//!
//! Middleware: CORS, tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/ask", post(handlers::ask::ask))
        .route(
            "/feedback",
            post(handlers::feedback::submit_feedback).get(handlers::feedback::list_feedback),
        )
        .route("/memories", get(handlers::memory::list_memories))
        .route("/interactions", get(handlers::interactions::list_interactions))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
