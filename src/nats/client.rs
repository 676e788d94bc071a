use anyhow::{Context, Result};
use async_nats::Client;
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::messages::StageJobMessage;
use crate::pipeline::{DispatchError, StageDispatcher};
use crate::recording::Stage;

/// NATS-backed stage dispatcher.
pub struct NatsDispatcher {
    client: Client,
    subject_prefix: String,
}

impl NatsDispatcher {
    /// Connect to the NATS server.
    pub async fn connect(url: &str, subject_prefix: impl Into<String>) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            subject_prefix: subject_prefix.into(),
        })
    }

    /// Subscribe to every stage job under the configured prefix.
    pub async fn subscribe_jobs(&self) -> Result<async_nats::Subscriber> {
        let subject = format!("{}.>", self.subject_prefix);

        info!("Subscribing to stage jobs on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject.clone())
            .await
            .context("Failed to subscribe to stage jobs")?;

        info!("Subscribed to {}", subject);

        Ok(subscriber)
    }
}

#[async_trait]
impl StageDispatcher for NatsDispatcher {
    /// Publish a stage job. Fire-and-forget: the caller never awaits the
    /// receiver, and a failure here is the caller's to log, not to
    /// propagate into its own outcome.
    async fn dispatch(&self, stage: Stage, recording_id: Uuid) -> Result<(), DispatchError> {
        let subject = format!("{}.{}", self.subject_prefix, stage.as_str());

        let message = StageJobMessage {
            recording_id,
            stage,
            dispatched_at: chrono::Utc::now().to_rfc3339(),
        };

        let payload =
            serde_json::to_vec(&message).map_err(|e| DispatchError(e.to_string()))?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|e| DispatchError(e.to_string()))?;

        info!(
            "Dispatched {} stage for recording {} to {}",
            stage, recording_id, subject
        );

        Ok(())
    }
}
