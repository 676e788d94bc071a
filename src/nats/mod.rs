//! NATS transport for stage dispatch
//!
//! The Trigger/Dispatch contract is satisfied with plain NATS pub/sub:
//! a stage job is a small JSON message published to
//! `<prefix>.<stage>`, and the pipeline worker subscribes to
//! `<prefix>.>`. Publishing survives the publisher's death (the broker
//! holds the message), and the receiver is idempotent, which is all the
//! contract asks for.

pub mod client;
pub mod messages;

pub use client::NatsDispatcher;
pub use messages::StageJobMessage;
