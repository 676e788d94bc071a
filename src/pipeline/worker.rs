use futures::stream::StreamExt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{StageOutcome, SummarizationStage, TranscriptionStage};
use crate::nats::StageJobMessage;
use crate::recording::Stage;

/// Consumer side of the fire-and-forget dispatch: receives stage jobs off
/// the subscription and runs the matching stage, one spawned task per job
/// so a slow upstream call never blocks the queue.
///
/// The worker is an idempotent receiver by construction — a duplicate or
/// replayed job loses the stage's guarded claim and becomes a no-op.
pub struct PipelineWorker {
    transcription: Arc<TranscriptionStage>,
    summarization: Arc<SummarizationStage>,
}

impl PipelineWorker {
    pub fn new(
        transcription: Arc<TranscriptionStage>,
        summarization: Arc<SummarizationStage>,
    ) -> Self {
        Self {
            transcription,
            summarization,
        }
    }

    /// Consume jobs until the subscription closes.
    pub async fn run(&self, mut jobs: async_nats::Subscriber) {
        info!("Pipeline worker started");

        while let Some(msg) = jobs.next().await {
            let job: StageJobMessage = match serde_json::from_slice(&msg.payload) {
                Ok(job) => job,
                Err(e) => {
                    warn!("Ignoring malformed stage job on {}: {}", msg.subject, e);
                    continue;
                }
            };

            let transcription = Arc::clone(&self.transcription);
            let summarization = Arc::clone(&self.summarization);

            tokio::spawn(async move {
                let result = match job.stage {
                    Stage::Transcript => transcription.run(job.recording_id).await,
                    Stage::Summary => summarization.run(job.recording_id).await,
                };

                match result {
                    Ok(StageOutcome::Completed) => {
                        info!("{} stage completed for recording {}", job.stage, job.recording_id);
                    }
                    Ok(StageOutcome::Skipped) => {
                        debug!(
                            "{} stage for recording {} was already claimed",
                            job.stage, job.recording_id
                        );
                    }
                    Err(e) => {
                        // The stage has already recorded the failure on the
                        // recording; this is the operator-facing trace.
                        error!(
                            "{} stage failed for recording {}: {}",
                            job.stage, job.recording_id, e
                        );
                    }
                }
            });
        }

        info!("Pipeline worker stopped");
    }
}
