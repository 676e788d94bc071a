//! External service collaborators
//!
//! The pipeline consumes two remote services through narrow traits:
//! speech-to-text and text generation. The production implementations
//! speak the OpenAI-compatible wire format (Groq, OpenAI, Ollama in
//! OpenAI mode, vLLM — anything with `/v1/audio/transcriptions` and
//! `/v1/chat/completions`), with connection details taken entirely from
//! configuration.
//!
//! Calls carry a bounded timeout and a single retry on transport errors;
//! anything past that becomes an `UpstreamError` and the calling stage
//! marks itself failed.

mod stt;
mod summarizer;

pub use stt::{HttpSpeechToText, SpeechToText, TranscribeOptions, Transcription};
pub use summarizer::{HttpTextGenerator, TextGenerator};

use thiserror::Error;

/// Errors from an external service call. Always terminal for the stage
/// that made the call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-success status code.
    #[error("service returned HTTP {0}")]
    Status(u16),

    /// The response body could not be parsed as expected JSON.
    #[error("failed to parse service response: {0}")]
    Parse(String),

    /// The service returned a response with no usable content.
    #[error("service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Request(e.to_string())
        }
    }
}

impl UpstreamError {
    /// Transport-level failures are worth one retry; service-level answers
    /// (bad status, unparseable body, empty content) are not.
    pub(crate) fn is_transient(&self) -> bool {
        matches!(self, UpstreamError::Request(_) | UpstreamError::Timeout)
    }
}
