use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Ingestion
        .route(
            "/sessions/:session_id/recordings",
            post(handlers::upload_recording),
        )
        // Recording queries and retries
        .route("/recordings/:id", get(handlers::get_recording))
        .route(
            "/recordings/:id/regenerate-summary",
            post(handlers::regenerate_summary),
        )
        .route("/recordings/:id/issues", get(handlers::list_issues))
        .route("/recordings/:id/audio-url", get(handlers::get_audio_url))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
