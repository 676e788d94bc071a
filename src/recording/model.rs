use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Status of one pipeline stage for a recording.
///
/// Moves forward only: `Pending → Processing → (Completed | Failed)`.
/// `Failed` may be reset to `Pending` by an explicit user-triggered
/// regenerate action, never automatically. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageStatus::Pending => "pending",
            StageStatus::Processing => "processing",
            StageStatus::Completed => "completed",
            StageStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Which of the two pipeline stages a status operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Transcript,
    Summary,
}

impl Stage {
    /// Stable name used in NATS subjects and log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Transcript => "transcript",
            Stage::Summary => "summary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One captured audio artifact of a session and its derived transcript
/// and summary.
///
/// Created by the ingestion path immediately after a successful audio
/// upload; mutated only by the two pipeline stages and by regenerate
/// actions. Never deleted by this pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub id: Uuid,

    /// Owning session (many-to-one; a session has at most one active
    /// recording).
    pub session_id: Uuid,

    /// Opaque blob-store key for the audio bytes.
    pub audio_path: String,

    /// Size of the uploaded audio in bytes.
    pub audio_bytes: u64,

    /// Audio duration in seconds, unknown until transcription reports it.
    pub duration_seconds: Option<f64>,

    /// Owned exclusively by the transcription stage.
    pub transcript: Option<String>,
    pub transcript_status: StageStatus,

    /// Owned exclusively by the summarization stage. Only leaves `Pending`
    /// once the transcript is completed.
    pub summary: Option<String>,
    pub summary_status: StageStatus,

    pub created_at: DateTime<Utc>,
}

impl Recording {
    /// New recording in the initial state: both stages `Pending`, nothing
    /// derived yet.
    pub fn new(session_id: Uuid, audio_path: String, audio_bytes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            audio_path,
            audio_bytes,
            duration_seconds: None,
            transcript: None,
            transcript_status: StageStatus::Pending,
            summary: None,
            summary_status: StageStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Current status of the given stage.
    pub fn status(&self, stage: Stage) -> StageStatus {
        match stage {
            Stage::Transcript => self.transcript_status,
            Stage::Summary => self.summary_status,
        }
    }
}
