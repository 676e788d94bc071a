//! The session-recording processing pipeline
//!
//! Two decoupled background stages, each triggered fire-and-forget by
//! whatever event precedes it:
//! - audio upload  → transcription stage (fetch audio, speech-to-text,
//!   fabrication screening, persist transcript)
//! - transcription success → summarization stage (fixed clinical-summary
//!   prompt, persist summary)
//!
//! Neither stage ever runs inside the user-facing request that triggered
//! it; the HTTP surface only reads status and fires dispatches. Guarded
//! status transitions make duplicate triggers harmless.

mod dispatch;
pub mod prompts;
mod summarization;
mod transcription;
mod worker;

pub use dispatch::{DispatchError, StageDispatcher};
pub use summarization::SummarizationStage;
pub use transcription::TranscriptionStage;
pub use worker::PipelineWorker;

/// What a stage invocation amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage claimed the recording and finished its work.
    Completed,

    /// Another worker already claimed the recording; nothing was done.
    Skipped,
}
