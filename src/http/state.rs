use std::sync::Arc;

use crate::blob::BlobStore;
use crate::pipeline::StageDispatcher;
use crate::recording::{LifecycleManager, RecordingStore};
use crate::validator::TranscriptValidator;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordingStore>,
    pub lifecycle: Arc<LifecycleManager>,
    pub blobs: Arc<dyn BlobStore>,
    pub dispatcher: Arc<dyn StageDispatcher>,
    pub validator: Arc<TranscriptValidator>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordingStore>,
        lifecycle: Arc<LifecycleManager>,
        blobs: Arc<dyn BlobStore>,
        dispatcher: Arc<dyn StageDispatcher>,
        validator: Arc<TranscriptValidator>,
    ) -> Self {
        Self {
            store,
            lifecycle,
            blobs,
            dispatcher,
            validator,
        }
    }
}
