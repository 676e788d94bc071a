//! Error taxonomy for the recording pipeline.
//!
//! Three families matter to callers:
//! - `StaleTransition`: a status guard was violated. Benign — another worker
//!   already handled the recording. Never surfaced to users.
//! - `Upstream`: a speech-to-text, text-generation, or blob call failed or
//!   returned unusable output. Always ends with the stage marked `failed`.
//! - `PreconditionFailed`: a user action was requested before its inputs
//!   exist (e.g. regenerating a summary with no transcript). Surfaced
//!   directly to the caller; no state change.

use thiserror::Error;
use uuid::Uuid;

use crate::blob::BlobError;
use crate::recording::{Stage, StageStatus, StoreError};
use crate::services::UpstreamError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A guarded status transition found a value other than the expected one.
    #[error("stale {stage} transition for recording {id}: expected {expected}")]
    StaleTransition {
        id: Uuid,
        stage: Stage,
        expected: StageStatus,
    },

    /// An external service call failed while running a stage.
    #[error("{stage} stage upstream failure for recording {id}: {source}")]
    Upstream {
        id: Uuid,
        stage: Stage,
        #[source]
        source: UpstreamError,
    },

    /// A user-initiated action was requested before its inputs exist.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("recording {0} not found")]
    NotFound(Uuid),

    #[error("recording store error: {0}")]
    Store(#[from] StoreError),

    #[error("blob store error: {0}")]
    Blob(#[from] BlobError),
}

impl PipelineError {
    /// Whether this error means "someone else already handled it".
    pub fn is_stale(&self) -> bool {
        matches!(self, PipelineError::StaleTransition { .. })
    }
}
