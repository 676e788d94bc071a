use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::UpstreamError;
use crate::config::SummarizerConfig;

/// External text-generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, UpstreamError>;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for any OpenAI-compatible `/v1/chat/completions` endpoint
/// (Groq, OpenAI, Ollama in OpenAI mode, vLLM). Connection details come
/// from [`SummarizerConfig`].
pub struct HttpTextGenerator {
    client: reqwest::Client,
    config: SummarizerConfig,
}

impl HttpTextGenerator {
    pub fn from_config(config: &SummarizerConfig) -> Self {
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
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, UpstreamError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user",   "content": user_prompt   }
            ],
            "stream": false,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(UpstreamError::EmptyResponse);
        }

        Ok(content)
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    /// One bounded attempt plus a single retry on transport errors.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, UpstreamError> {
        match self.request(system_prompt, user_prompt).await {
            Ok(text) => Ok(text),
            Err(e) if e.is_transient() => {
                warn!("Completion request failed ({}), retrying once", e);
                self.request(system_prompt, user_prompt).await
            }
            Err(e) => Err(e),
        }
    }
}
