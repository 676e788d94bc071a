use super::state::AppState;
use crate::error::PipelineError;
use crate::recording::{Recording, Stage};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Signed playback URLs stay valid for an hour.
const AUDIO_URL_TTL: Duration = Duration::from_secs(3600);

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadRecordingResponse {
    pub recording_id: Uuid,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RegenerateSummaryResponse {
    pub recording_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AudioUrlResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn not_found(id: Uuid) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Recording {} not found", id),
        }),
    )
        .into_response()
}

fn internal_error(context: &str, err: impl std::fmt::Display) -> axum::response::Response {
    error!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: context.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions/:session_id/recordings
/// Ingest a finished audio capture: store the bytes, create the Recording,
/// and fire-and-forget the transcription stage.
pub async fn upload_recording(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    // Pull the "audio" part out of the form.
    let mut audio: Option<Vec<u8>> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("audio") {
                    match field.bytes().await {
                        Ok(bytes) => {
                            audio = Some(bytes.to_vec());
                            break;
                        }
                        Err(e) => {
                            return internal_error("Failed to read audio upload", e);
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Malformed multipart body: {}", e),
                    }),
                )
                    .into_response();
            }
        }
    }

    let audio = match audio {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No audio file provided".to_string(),
                }),
            )
                .into_response();
        }
    };

    info!(
        "Uploading recording for session {} ({} bytes)",
        session_id,
        audio.len()
    );

    let audio_path = match state.blobs.upload(&audio).await {
        Ok(path) => path,
        Err(e) => return internal_error("Failed to store audio", e),
    };

    let recording = Recording::new(session_id, audio_path, audio.len() as u64);
    let recording_id = recording.id;

    if let Err(e) = state.store.insert(recording).await {
        return internal_error("Failed to create recording", e);
    }

    info!("Recording {} created for session {}", recording_id, session_id);

    // Best-effort: a lost dispatch leaves the recording pending, it does
    // not fail the upload the user already completed.
    if let Err(e) = state.dispatcher.dispatch(Stage::Transcript, recording_id).await {
        warn!(
            "Failed to dispatch transcription for recording {}: {}",
            recording_id, e
        );
    }

    (
        StatusCode::OK,
        Json(UploadRecordingResponse {
            recording_id,
            status: "pending".to_string(),
            message: "Recording uploaded successfully. Transcription started.".to_string(),
        }),
    )
        .into_response()
}

/// GET /recordings/:id
/// Fetch a recording with both stage statuses. UI polling reads this.
pub async fn get_recording(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.store.get(id).await {
        Ok(Some(recording)) => (StatusCode::OK, Json(recording)).into_response(),
        Ok(None) => not_found(id),
        Err(e) => internal_error("Failed to load recording", e),
    }
}

/// POST /recordings/:id/regenerate-summary
/// User-triggered retry for a failed (or stale) summary. Requires a
/// completed transcript.
pub async fn regenerate_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.lifecycle.regenerate_summary(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(RegenerateSummaryResponse {
                recording_id: id,
                message: "Summary regeneration triggered".to_string(),
            }),
        )
            .into_response(),
        Err(PipelineError::NotFound(_)) => not_found(id),
        Err(PipelineError::PreconditionFailed(reason)) => (
            StatusCode::PRECONDITION_FAILED,
            Json(ErrorResponse { error: reason }),
        )
            .into_response(),
        Err(e) => internal_error("Failed to regenerate summary", e),
    }
}

/// GET /recordings/:id/issues
/// Re-run the validator over the stored transcript for diagnostics. The
/// issue list is display material, never blocking.
pub async fn list_issues(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let recording = match state.store.get(id).await {
        Ok(Some(recording)) => recording,
        Ok(None) => return not_found(id),
        Err(e) => return internal_error("Failed to load recording", e),
    };

    let transcript = recording.transcript.unwrap_or_default();
    let result = state
        .validator
        .validate(&transcript, recording.duration_seconds);

    (StatusCode::OK, Json(result)).into_response()
}

/// GET /recordings/:id/audio-url
/// Time-limited URL for audio playback.
pub async fn get_audio_url(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let recording = match state.store.get(id).await {
        Ok(Some(recording)) => recording,
        Ok(None) => return not_found(id),
        Err(e) => return internal_error("Failed to load recording", e),
    };

    match state
        .blobs
        .signed_url(&recording.audio_path, AUDIO_URL_TTL)
        .await
    {
        Ok(url) => (StatusCode::OK, Json(AudioUrlResponse { url })).into_response(),
        Err(e) => internal_error("Failed to generate audio URL", e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
