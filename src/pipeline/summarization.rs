use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::prompts::{SUMMARY_SYSTEM_PROMPT, SUMMARY_USER_PREFIX};
use super::StageOutcome;
use crate::error::PipelineError;
use crate::recording::{LifecycleManager, Stage, StageStatus};
use crate::services::TextGenerator;

/// Second pipeline stage: completed transcript in, structured summary out.
pub struct SummarizationStage {
    lifecycle: Arc<LifecycleManager>,
    generator: Arc<dyn TextGenerator>,
}

impl SummarizationStage {
    pub fn new(lifecycle: Arc<LifecycleManager>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            lifecycle,
            generator,
        }
    }

    /// Run summarization for one recording whose transcript is expected to
    /// be completed. Regeneration re-enters here after the reset.
    pub async fn run(&self, id: Uuid) -> Result<StageOutcome, PipelineError> {
        match self
            .lifecycle
            .transition_summary(id, StageStatus::Pending, StageStatus::Processing)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_stale() => {
                debug!("Summarization of {} already claimed elsewhere, skipping", id);
                return Ok(StageOutcome::Skipped);
            }
            Err(e) => return Err(e),
        }

        let recording = self.lifecycle.get(id).await?;

        // A job can only legitimately arrive after transcription completed;
        // anything else is a malformed or premature dispatch. Mark the
        // summary failed so the manual regenerate path can recover it.
        let transcript = match recording.transcript {
            Some(t) if recording.transcript_status == StageStatus::Completed => t,
            _ => {
                error!(
                    "Summarization of {} dispatched without a completed transcript",
                    id
                );
                self.lifecycle.mark_failed(id, Stage::Summary).await?;
                return Err(PipelineError::PreconditionFailed(format!(
                    "recording {} has no completed transcript",
                    id
                )));
            }
        };

        // Silence transcribes to an empty string; summarizing it would be
        // wasted cost and an invitation for the model to invent content.
        if transcript.trim().is_empty() {
            info!("Recording {} transcript is empty, storing empty summary", id);
            self.lifecycle.set_summary_result(id, String::new()).await?;
            return Ok(StageOutcome::Completed);
        }

        let user_prompt = format!("{}{}", SUMMARY_USER_PREFIX, transcript);

        let summary = match self
            .generator
            .complete(SUMMARY_SYSTEM_PROMPT, &user_prompt)
            .await
        {
            Ok(text) => text,
            Err(source) => {
                error!("Summary generation failed for recording {}: {}", id, source);
                self.lifecycle.mark_failed(id, Stage::Summary).await?;
                return Err(PipelineError::Upstream {
                    id,
                    stage: Stage::Summary,
                    source,
                });
            }
        };

        self.lifecycle.set_summary_result(id, summary).await?;

        Ok(StageOutcome::Completed)
    }
}
