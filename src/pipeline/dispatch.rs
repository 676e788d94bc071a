use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::recording::Stage;

/// A dispatch that could not be handed to the transport.
///
/// Dispatch is best-effort by design: the caller logs this and moves on.
/// A lost dispatch leaves the recording `pending` until a manual action
/// re-triggers the stage.
#[derive(Debug, Error)]
#[error("stage dispatch failed: {0}")]
pub struct DispatchError(pub String);

/// Fire-and-forget invocation of a pipeline stage.
///
/// The contract, not the mechanism, is what matters: the invocation is
/// asynchronous relative to the caller, survives the caller's process
/// going away, and the receiver is idempotent (the guarded status
/// transitions absorb duplicate deliveries).
#[async_trait]
pub trait StageDispatcher: Send + Sync {
    async fn dispatch(&self, stage: Stage, recording_id: Uuid) -> Result<(), DispatchError>;
}
