use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{Recording, Stage, StageStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("recording {0} not found")]
    NotFound(Uuid),

    #[error("recording {0} already exists")]
    Duplicate(Uuid),

    /// Backend failure (connection loss, I/O) in a non-memory store.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistence seam for recordings.
///
/// The operations are deliberately domain-shaped rather than a generic
/// key/value surface: each mutating call must be atomic with respect to
/// concurrent callers, because `transition_status` is the compare-and-set
/// primitive the whole pipeline's idempotency rests on.
#[async_trait]
pub trait RecordingStore: Send + Sync {
    async fn insert(&self, recording: Recording) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Recording>, StoreError>;

    /// Atomically set `stage`'s status to `to` iff it currently equals
    /// `from`. Returns `false` (and changes nothing) on a mismatch, so a
    /// delayed or duplicate worker cannot overwrite newer state.
    async fn transition_status(
        &self,
        id: Uuid,
        stage: Stage,
        from: StageStatus,
        to: StageStatus,
    ) -> Result<bool, StoreError>;

    /// Atomically write the transcript, the reported audio duration, and
    /// move `transcript_status` to `Completed`.
    async fn set_transcript_result(
        &self,
        id: Uuid,
        transcript: String,
        duration_seconds: Option<f64>,
    ) -> Result<(), StoreError>;

    /// Atomically write the summary and move `summary_status` to `Completed`.
    async fn set_summary_result(&self, id: Uuid, summary: String) -> Result<(), StoreError>;

    /// Clear the summary and move `summary_status` back to `Pending`.
    /// Used only by the user-triggered regenerate path.
    async fn reset_summary(&self, id: Uuid) -> Result<(), StoreError>;
}

/// In-memory store: a `HashMap` behind a `tokio::sync::RwLock`.
///
/// Every mutation happens under the write lock, which is what makes
/// `transition_status` a sound compare-and-set. A database-backed store
/// would express the same operation as a conditional UPDATE.
#[derive(Clone, Default)]
pub struct MemoryRecordingStore {
    recordings: Arc<RwLock<HashMap<Uuid, Recording>>>,
}

impl MemoryRecordingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn set_status(recording: &mut Recording, stage: Stage, to: StageStatus) {
    match stage {
        Stage::Transcript => recording.transcript_status = to,
        Stage::Summary => recording.summary_status = to,
    }
}

#[async_trait]
impl RecordingStore for MemoryRecordingStore {
    async fn insert(&self, recording: Recording) -> Result<(), StoreError> {
        let mut recordings = self.recordings.write().await;
        if recordings.contains_key(&recording.id) {
            return Err(StoreError::Duplicate(recording.id));
        }
        recordings.insert(recording.id, recording);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Recording>, StoreError> {
        let recordings = self.recordings.read().await;
        Ok(recordings.get(&id).cloned())
    }

    async fn transition_status(
        &self,
        id: Uuid,
        stage: Stage,
        from: StageStatus,
        to: StageStatus,
    ) -> Result<bool, StoreError> {
        let mut recordings = self.recordings.write().await;
        let recording = recordings.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if recording.status(stage) != from {
            return Ok(false);
        }
        set_status(recording, stage, to);
        Ok(true)
    }

    async fn set_transcript_result(
        &self,
        id: Uuid,
        transcript: String,
        duration_seconds: Option<f64>,
    ) -> Result<(), StoreError> {
        let mut recordings = self.recordings.write().await;
        let recording = recordings.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        recording.transcript = Some(transcript);
        recording.duration_seconds = duration_seconds;
        recording.transcript_status = StageStatus::Completed;
        Ok(())
    }

    async fn set_summary_result(&self, id: Uuid, summary: String) -> Result<(), StoreError> {
        let mut recordings = self.recordings.write().await;
        let recording = recordings.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        recording.summary = Some(summary);
        recording.summary_status = StageStatus::Completed;
        Ok(())
    }

    async fn reset_summary(&self, id: Uuid) -> Result<(), StoreError> {
        let mut recordings = self.recordings.write().await;
        let recording = recordings.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        recording.summary = None;
        recording.summary_status = StageStatus::Pending;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recording() -> Recording {
        Recording::new(Uuid::new_v4(), "client/session/audio.webm".to_string(), 1024)
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = MemoryRecordingStore::new();
        let recording = sample_recording();
        let id = recording.id;

        store.insert(recording).await.unwrap();

        let loaded = store.get(id).await.unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.transcript_status, StageStatus::Pending);
        assert_eq!(loaded.summary_status, StageStatus::Pending);
        assert!(loaded.transcript.is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_rejected() {
        let store = MemoryRecordingStore::new();
        let recording = sample_recording();

        store.insert(recording.clone()).await.unwrap();
        let err = store.insert(recording).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn transition_applies_only_on_match() {
        let store = MemoryRecordingStore::new();
        let recording = sample_recording();
        let id = recording.id;
        store.insert(recording).await.unwrap();

        // First claim wins.
        let claimed = store
            .transition_status(id, Stage::Transcript, StageStatus::Pending, StageStatus::Processing)
            .await
            .unwrap();
        assert!(claimed);

        // Second claim of the same transition is a no-op.
        let claimed_again = store
            .transition_status(id, Stage::Transcript, StageStatus::Pending, StageStatus::Processing)
            .await
            .unwrap();
        assert!(!claimed_again);

        let loaded = store.get(id).await.unwrap().unwrap();
        assert_eq!(loaded.transcript_status, StageStatus::Processing);
        // Summary status untouched by transcript transitions.
        assert_eq!(loaded.summary_status, StageStatus::Pending);
    }

    #[tokio::test]
    async fn transition_unknown_recording_errors() {
        let store = MemoryRecordingStore::new();
        let err = store
            .transition_status(
                Uuid::new_v4(),
                Stage::Summary,
                StageStatus::Pending,
                StageStatus::Processing,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn transcript_result_sets_text_duration_and_status() {
        let store = MemoryRecordingStore::new();
        let recording = sample_recording();
        let id = recording.id;
        store.insert(recording).await.unwrap();

        store
            .set_transcript_result(id, "hello there".to_string(), Some(12.5))
            .await
            .unwrap();

        let loaded = store.get(id).await.unwrap().unwrap();
        assert_eq!(loaded.transcript.as_deref(), Some("hello there"));
        assert_eq!(loaded.duration_seconds, Some(12.5));
        assert_eq!(loaded.transcript_status, StageStatus::Completed);
    }

    #[tokio::test]
    async fn reset_summary_clears_text_and_returns_to_pending() {
        let store = MemoryRecordingStore::new();
        let recording = sample_recording();
        let id = recording.id;
        store.insert(recording).await.unwrap();

        store.set_summary_result(id, "old summary".to_string()).await.unwrap();
        store.reset_summary(id).await.unwrap();

        let loaded = store.get(id).await.unwrap().unwrap();
        assert!(loaded.summary.is_none());
        assert_eq!(loaded.summary_status, StageStatus::Pending);
    }
}
