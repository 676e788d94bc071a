use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use session_scribe::pipeline::prompts;
use session_scribe::{
    create_router, AppState, BlobStore, Config, FabricationPatterns, HttpSpeechToText,
    HttpTextGenerator, LifecycleManager, LocalBlobStore, MemoryRecordingStore, NatsDispatcher,
    PipelineWorker, RecordingStore, StageDispatcher, SummarizationStage, TranscribeOptions,
    TranscriptValidator, TranscriptionStage,
};

#[derive(Parser)]
#[command(name = "session-scribe")]
#[command(about = "Session-recording processing pipeline: transcription, fabrication screening, summarization")]
struct Cli {
    /// Configuration file (without extension)
    #[arg(short, long, default_value = "config/session-scribe")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} starting", cfg.service.name);
    info!("NATS at {}", cfg.nats.url);
    info!("Audio blobs under {}", cfg.storage.recordings_path);

    // Transport first; nothing works without dispatch.
    let nats = Arc::new(
        NatsDispatcher::connect(&cfg.nats.url, cfg.nats.subject_prefix.clone())
            .await
            .context("Failed to set up stage dispatch")?,
    );
    let dispatcher: Arc<dyn StageDispatcher> = nats.clone();

    let store: Arc<dyn RecordingStore> = Arc::new(MemoryRecordingStore::new());
    let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(&cfg.storage.recordings_path));

    let patterns = FabricationPatterns::with_extra(&cfg.validation.extra_patterns)
        .context("Invalid validation.extra_patterns")?;
    let validator = Arc::new(TranscriptValidator::new(patterns));

    let lifecycle = Arc::new(LifecycleManager::new(
        Arc::clone(&store),
        Arc::clone(&dispatcher),
    ));

    let stt = Arc::new(HttpSpeechToText::from_config(&cfg.stt));
    let generator = Arc::new(HttpTextGenerator::from_config(&cfg.summarizer));

    let transcribe_options = TranscribeOptions {
        language: cfg.stt.language.clone(),
        temperature: cfg.stt.temperature,
        prompt: prompts::TRANSCRIPTION_PROMPT.to_string(),
    };

    let transcription = Arc::new(TranscriptionStage::new(
        Arc::clone(&lifecycle),
        Arc::clone(&blobs),
        stt,
        Arc::clone(&validator),
        Arc::clone(&dispatcher),
        transcribe_options,
    ));
    let summarization = Arc::new(SummarizationStage::new(Arc::clone(&lifecycle), generator));

    // Pipeline worker: consumes stage jobs off NATS in the background.
    let subscriber = nats
        .subscribe_jobs()
        .await
        .context("Failed to subscribe to stage jobs")?;
    let worker = PipelineWorker::new(transcription, summarization);
    tokio::spawn(async move {
        worker.run(subscriber).await;
    });

    // HTTP surface: status reads, uploads, manual retries.
    let state = AppState::new(store, lifecycle, blobs, dispatcher, validator);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server exited")?;

    Ok(())
}
