//! HTTP API for the rest of the application
//!
//! The user-facing app only ever reads status and fires dispatches; it
//! never blocks on pipeline completion. Routes:
//! - POST /sessions/:session_id/recordings - Upload a finished capture
//! - GET /recordings/:id - Fetch a recording with its statuses
//! - POST /recordings/:id/regenerate-summary - User-triggered summary retry
//! - GET /recordings/:id/issues - Validator diagnostics for the transcript
//! - GET /recordings/:id/audio-url - Time-limited playback URL
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
