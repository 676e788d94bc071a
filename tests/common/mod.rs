//! Hand-rolled fakes for exercising the pipeline without NATS or any
//! external service.

// Each test binary compiles this module separately and uses a subset.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use session_scribe::{
    BlobError, BlobStore, DispatchError, SpeechToText, Stage, StageDispatcher, TextGenerator,
    TranscribeOptions, Transcription, UpstreamError,
};

/// Dispatcher that records every dispatch instead of publishing it.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub sent: Mutex<Vec<(Stage, Uuid)>>,
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<(Stage, Uuid)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl StageDispatcher for RecordingDispatcher {
    async fn dispatch(&self, stage: Stage, recording_id: Uuid) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push((stage, recording_id));
        Ok(())
    }
}

/// Dispatcher whose transport is always down.
pub struct FailingDispatcher;

#[async_trait]
impl StageDispatcher for FailingDispatcher {
    async fn dispatch(&self, _stage: Stage, _recording_id: Uuid) -> Result<(), DispatchError> {
        Err(DispatchError("broker unreachable".to_string()))
    }
}

/// In-memory blob store.
#[derive(Default)]
pub struct FakeBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeBlobStore {
    pub fn with_blob(path: &str, bytes: &[u8]) -> Self {
        let store = Self::default();
        store
            .blobs
            .lock()
            .unwrap()
            .insert(path.to_string(), bytes.to_vec());
        store
    }
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn upload(&self, bytes: &[u8]) -> Result<String, BlobError> {
        let key = format!("{}.audio", Uuid::new_v4());
        self.blobs
            .lock()
            .unwrap()
            .insert(key.clone(), bytes.to_vec());
        Ok(key)
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, BlobError> {
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| BlobError::NotFound(path.to_string()))
    }

    async fn signed_url(
        &self,
        path: &str,
        _ttl: std::time::Duration,
    ) -> Result<String, BlobError> {
        Ok(format!("fake://{}", path))
    }

    async fn delete(&self, path: &str) -> Result<(), BlobError> {
        self.blobs.lock().unwrap().remove(path);
        Ok(())
    }
}

/// Speech-to-text fake with a canned answer and a call counter.
pub struct FakeSpeechToText {
    pub text: String,
    pub duration: Option<f64>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeSpeechToText {
    pub fn returning(text: &str, duration: Option<f64>) -> Self {
        Self {
            text: text.to_string(),
            duration,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: String::new(),
            duration: None,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechToText for FakeSpeechToText {
    async fn transcribe(
        &self,
        _audio: Vec<u8>,
        _options: &TranscribeOptions,
    ) -> Result<Transcription, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(UpstreamError::Status(500));
        }
        Ok(Transcription {
            text: self.text.clone(),
            duration_seconds: self.duration,
        })
    }
}

/// Text-generation fake with a canned answer and a call counter.
pub struct FakeTextGenerator {
    pub response: String,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeTextGenerator {
    pub fn returning(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(UpstreamError::EmptyResponse);
        }
        Ok(self.response.clone())
    }
}
