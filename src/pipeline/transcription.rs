use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::{StageDispatcher, StageOutcome};
use crate::blob::BlobStore;
use crate::error::PipelineError;
use crate::recording::{LifecycleManager, Stage, StageStatus};
use crate::services::{SpeechToText, TranscribeOptions};
use crate::validator::TranscriptValidator;

/// First pipeline stage: audio bytes in, screened transcript out.
pub struct TranscriptionStage {
    lifecycle: Arc<LifecycleManager>,
    blobs: Arc<dyn BlobStore>,
    stt: Arc<dyn SpeechToText>,
    validator: Arc<TranscriptValidator>,
    dispatcher: Arc<dyn StageDispatcher>,
    options: TranscribeOptions,
}

impl TranscriptionStage {
    pub fn new(
        lifecycle: Arc<LifecycleManager>,
        blobs: Arc<dyn BlobStore>,
        stt: Arc<dyn SpeechToText>,
        validator: Arc<TranscriptValidator>,
        dispatcher: Arc<dyn StageDispatcher>,
        options: TranscribeOptions,
    ) -> Self {
        Self {
            lifecycle,
            blobs,
            stt,
            validator,
            dispatcher,
            options,
        }
    }

    /// Run transcription for one recording, expected to be `pending`.
    ///
    /// Claims the recording with a guarded `pending → processing`
    /// transition; a lost claim means another worker is already on it and
    /// the call returns `Skipped` without touching anything. Any upstream
    /// failure marks the stage `failed` and stops — no automatic retry, a
    /// human re-initiates.
    pub async fn run(&self, id: Uuid) -> Result<StageOutcome, PipelineError> {
        match self
            .lifecycle
            .transition_transcript(id, StageStatus::Pending, StageStatus::Processing)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_stale() => {
                debug!("Transcription of {} already claimed elsewhere, skipping", id);
                return Ok(StageOutcome::Skipped);
            }
            Err(e) => return Err(e),
        }

        let recording = self.lifecycle.get(id).await?;

        let audio = match self.blobs.download(&recording.audio_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to fetch audio for recording {}: {}", id, e);
                self.lifecycle.mark_failed(id, Stage::Transcript).await?;
                return Err(e.into());
            }
        };

        let transcription = match self.stt.transcribe(audio, &self.options).await {
            Ok(t) => t,
            Err(source) => {
                error!("Speech-to-text failed for recording {}: {}", id, source);
                self.lifecycle.mark_failed(id, Stage::Transcript).await?;
                return Err(PipelineError::Upstream {
                    id,
                    stage: Stage::Transcript,
                    source,
                });
            }
        };

        let validation = self
            .validator
            .validate(&transcription.text, transcription.duration_seconds);

        if !validation.issues.is_empty() {
            warn!(
                "Recording {} transcript flagged {} issue(s), confidence {:.2}",
                id,
                validation.issues.len(),
                validation.confidence
            );
            for issue in &validation.issues {
                debug!("Recording {} validation: {}", id, issue);
            }
        }

        // Store the cleaned text when the raw transcript fails screening;
        // the raw text untouched otherwise.
        let transcript = if validation.is_valid {
            transcription.text
        } else {
            warn!(
                "Recording {} transcript rejected by screening, storing cleaned text",
                id
            );
            validation.cleaned_transcript
        };

        self.lifecycle
            .set_transcript_result(id, transcript, transcription.duration_seconds)
            .await?;

        // The stages are decoupled: a summarization dispatch failure is
        // logged and left for manual regeneration, it neither blocks nor
        // fails the finished transcription.
        if let Err(e) = self.dispatcher.dispatch(Stage::Summary, id).await {
            error!("Failed to dispatch summarization for recording {}: {}", id, e);
        }

        Ok(StageOutcome::Completed)
    }
}
