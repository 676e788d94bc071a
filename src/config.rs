use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub nats: NatsConfig,
    pub storage: StorageConfig,
    pub stt: SttConfig,
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    pub url: String,

    /// Stage jobs are published to `<subject_prefix>.<stage>`.
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored audio blobs.
    pub recordings_path: String,
}

/// Connection settings for the speech-to-text service (any
/// OpenAI-compatible `/v1/audio/transcriptions` endpoint).
#[derive(Debug, Clone, Deserialize)]
pub struct SttConfig {
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_stt_model")]
    pub model: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// 0.0 keeps the model from improvising on unclear audio.
    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_stt_timeout")]
    pub timeout_secs: u64,
}

/// Connection settings for the text-generation service (any
/// OpenAI-compatible `/v1/chat/completions` endpoint).
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_summarizer_model")]
    pub model: String,

    #[serde(default = "default_summarizer_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_summarizer_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    /// Deployment-specific fabrication patterns appended to the built-in
    /// library (e.g. stray names the transcription model keeps inserting).
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

fn default_subject_prefix() -> String {
    "scribe.jobs".to_string()
}

fn default_stt_model() -> String {
    "whisper-large-v3".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_stt_timeout() -> u64 {
    120
}

fn default_summarizer_model() -> String {
    "llama-3.1-70b-versatile".to_string()
}

fn default_summarizer_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_summarizer_timeout() -> u64 {
    60
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("SCRIBE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai".to_string(),
            api_key: None,
            model: default_stt_model(),
            language: default_language(),
            temperature: 0.0,
            timeout_secs: default_stt_timeout(),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai".to_string(),
            api_key: None,
            model: default_summarizer_model(),
            temperature: default_summarizer_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_summarizer_timeout(),
        }
    }
}
