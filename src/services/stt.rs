use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::UpstreamError;
use crate::config::SttConfig;

/// Options for one transcription call.
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    /// ISO language hint, e.g. "en".
    pub language: String,

    /// Sampling temperature; 0.0 keeps the model from improvising.
    pub temperature: f32,

    /// System instruction constraining the model to actually-spoken words.
    /// A mitigation, not a guarantee — the validator is the second line of
    /// defense.
    pub prompt: String,
}

/// A finished transcription as reported by the service.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub text: String,

    /// Audio duration in seconds, when the service reports it.
    pub duration_seconds: Option<f64>,
}

/// External speech-to-text service.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        options: &TranscribeOptions,
    ) -> Result<Transcription, UpstreamError>;
}

/// `verbose_json` response from an OpenAI-compatible transcription endpoint.
#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    text: String,
    #[serde(default)]
    duration: Option<f64>,
}

/// Client for any OpenAI-compatible `/v1/audio/transcriptions` endpoint
/// (Groq Whisper, OpenAI, local whisper servers). All connection details
/// come from [`SttConfig`]; nothing is hardcoded.
pub struct HttpSpeechToText {
    client: reqwest::Client,
    config: SttConfig,
}

impl HttpSpeechToText {
    pub fn from_config(config: &SttConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    async fn request(
        &self,
        audio: Vec<u8>,
        options: &TranscribeOptions,
    ) -> Result<Transcription, UpstreamError> {
        let url = format!("{}/v1/audio/transcriptions", self.config.base_url);

        // The audio goes up as an in-memory multipart part; nothing is
        // staged to disk on the way to the service.
        let file = reqwest::multipart::Part::bytes(audio)
            .file_name("audio.webm")
            .mime_str("application/octet-stream")
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("model", self.config.model.clone())
            .text("language", options.language.clone())
            .text("temperature", options.temperature.to_string())
            .text("prompt", options.prompt.clone())
            .text("response_format", "verbose_json");

        let mut req = self.client.post(&url).multipart(form);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: VerboseTranscription = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        Ok(Transcription {
            text: body.text,
            duration_seconds: body.duration,
        })
    }
}

#[async_trait]
impl SpeechToText for HttpSpeechToText {
    /// One bounded attempt plus a single retry on transport errors.
    /// Service-level answers (bad status, unparseable body) are terminal.
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        options: &TranscribeOptions,
    ) -> Result<Transcription, UpstreamError> {
        match self.request(audio.clone(), options).await {
            Ok(result) => Ok(result),
            Err(e) if e.is_transient() => {
                warn!("Transcription request failed ({}), retrying once", e);
                self.request(audio, options).await
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SttConfig;

    #[test]
    fn from_config_builds_without_panic() {
        let config = SttConfig::default();
        let _client = HttpSpeechToText::from_config(&config);
    }

    #[test]
    fn client_is_object_safe() {
        let config = SttConfig::default();
        let client: Box<dyn SpeechToText> = Box::new(HttpSpeechToText::from_config(&config));
        drop(client);
    }

    #[test]
    fn verbose_json_parses_with_and_without_duration() {
        let with: VerboseTranscription =
            serde_json::from_str(r#"{"text": "hello", "duration": 12.5, "language": "en"}"#)
                .unwrap();
        assert_eq!(with.text, "hello");
        assert_eq!(with.duration, Some(12.5));

        let without: VerboseTranscription = serde_json::from_str(r#"{"text": ""}"#).unwrap();
        assert_eq!(without.text, "");
        assert_eq!(without.duration, None);
    }
}
