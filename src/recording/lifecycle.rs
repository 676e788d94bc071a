use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Recording, RecordingStore, Stage, StageStatus};
use crate::error::PipelineError;
use crate::pipeline::StageDispatcher;

/// Owner of the recording state machine.
///
/// All status movement goes through here. The two stages use the guarded
/// transitions to claim work, `mark_failed` to record upstream failures,
/// and the result setters to publish their output. User-initiated retries
/// enter through `regenerate_summary`.
///
/// Per-stage state machine:
/// `pending --start--> processing --success--> completed`;
/// `processing --failure--> failed`; `failed --regenerate--> pending`.
/// `completed` is terminal and never re-entered automatically.
pub struct LifecycleManager {
    store: Arc<dyn RecordingStore>,
    dispatcher: Arc<dyn StageDispatcher>,
}

impl LifecycleManager {
    pub fn new(store: Arc<dyn RecordingStore>, dispatcher: Arc<dyn StageDispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Fetch a recording or fail with `NotFound`.
    pub async fn get(&self, id: Uuid) -> Result<Recording, PipelineError> {
        self.store
            .get(id)
            .await?
            .ok_or(PipelineError::NotFound(id))
    }

    /// Guarded compare-and-set on `transcript_status`. Fails with
    /// `StaleTransition` (no state change) if the stored value is not
    /// `from` — a delayed or duplicate trigger loses the race cleanly.
    pub async fn transition_transcript(
        &self,
        id: Uuid,
        from: StageStatus,
        to: StageStatus,
    ) -> Result<(), PipelineError> {
        self.transition(id, Stage::Transcript, from, to).await
    }

    /// Guarded compare-and-set on `summary_status`.
    pub async fn transition_summary(
        &self,
        id: Uuid,
        from: StageStatus,
        to: StageStatus,
    ) -> Result<(), PipelineError> {
        self.transition(id, Stage::Summary, from, to).await
    }

    async fn transition(
        &self,
        id: Uuid,
        stage: Stage,
        from: StageStatus,
        to: StageStatus,
    ) -> Result<(), PipelineError> {
        let applied = self.store.transition_status(id, stage, from, to).await?;
        if !applied {
            return Err(PipelineError::StaleTransition {
                id,
                stage,
                expected: from,
            });
        }
        debug!("Recording {} {} status: {} -> {}", id, stage, from, to);
        Ok(())
    }

    /// Write the transcript and reported duration, moving the transcript
    /// stage to `completed` in one atomic store operation.
    pub async fn set_transcript_result(
        &self,
        id: Uuid,
        transcript: String,
        duration_seconds: Option<f64>,
    ) -> Result<(), PipelineError> {
        self.store
            .set_transcript_result(id, transcript, duration_seconds)
            .await?;
        info!("Recording {} transcript completed", id);
        Ok(())
    }

    /// Write the summary, moving the summary stage to `completed`.
    pub async fn set_summary_result(&self, id: Uuid, summary: String) -> Result<(), PipelineError> {
        self.store.set_summary_result(id, summary).await?;
        info!("Recording {} summary completed", id);
        Ok(())
    }

    /// Move the named stage to `failed` from whatever non-terminal state it
    /// is in. A `completed` result is never downgraded; an already-`failed`
    /// stage stays `failed`. Expressed purely through the compare-and-set
    /// primitive so the store never learns transition rules.
    pub async fn mark_failed(&self, id: Uuid, stage: Stage) -> Result<(), PipelineError> {
        for from in [StageStatus::Processing, StageStatus::Pending] {
            if self
                .store
                .transition_status(id, stage, from, StageStatus::Failed)
                .await?
            {
                warn!("Recording {} {} stage marked failed", id, stage);
                return Ok(());
            }
        }
        debug!(
            "Recording {} {} stage not marked failed (already completed or failed)",
            id, stage
        );
        Ok(())
    }

    /// User-triggered summary retry.
    ///
    /// Requires a completed transcript; fails with `PreconditionFailed` and
    /// touches nothing otherwise. On success the stored summary is cleared,
    /// the summary stage returns to `pending`, and the summarization stage
    /// is re-dispatched fire-and-forget.
    pub async fn regenerate_summary(&self, id: Uuid) -> Result<(), PipelineError> {
        let recording = self.get(id).await?;

        if recording.transcript_status != StageStatus::Completed
            || recording.transcript.is_none()
        {
            return Err(PipelineError::PreconditionFailed(format!(
                "recording {} has no completed transcript to summarize",
                id
            )));
        }

        self.store.reset_summary(id).await?;
        info!("Recording {} summary reset for regeneration", id);

        // Fire-and-forget: a dispatch failure leaves the summary pending
        // for another manual regenerate, it does not undo the reset.
        if let Err(e) = self.dispatcher.dispatch(Stage::Summary, id).await {
            warn!("Failed to dispatch summary regeneration for {}: {}", id, e);
        }

        Ok(())
    }
}
