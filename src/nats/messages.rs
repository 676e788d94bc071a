use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recording::Stage;

/// Stage job published to NATS. Carries only the recording id and the
/// stage name — the worker reads everything else from the store, so a
/// stale message can never overwrite newer state.
#[derive(Debug, Serialize, Deserialize)]
pub struct StageJobMessage {
    pub recording_id: Uuid,
    pub stage: Stage,

    /// RFC3339 timestamp of when the job was published.
    pub dispatched_at: String,
}
