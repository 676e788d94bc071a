pub mod blob;
pub mod config;
pub mod error;
pub mod http;
pub mod nats;
pub mod pipeline;
pub mod recording;
pub mod services;
pub mod validator;

pub use blob::{BlobError, BlobStore, LocalBlobStore};
pub use config::Config;
pub use error::PipelineError;
pub use http::{create_router, AppState};
pub use nats::{NatsDispatcher, StageJobMessage};
pub use pipeline::{
    DispatchError, PipelineWorker, StageDispatcher, StageOutcome, SummarizationStage,
    TranscriptionStage,
};
pub use recording::{
    LifecycleManager, MemoryRecordingStore, Recording, RecordingStore, Stage, StageStatus,
    StoreError,
};
pub use services::{
    HttpSpeechToText, HttpTextGenerator, SpeechToText, TextGenerator, TranscribeOptions,
    Transcription, UpstreamError,
};
pub use validator::{FabricationPatterns, TranscriptValidator, ValidationResult};
