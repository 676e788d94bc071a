//! Recording entity, persistence seam, and lifecycle state machine
//!
//! This module owns everything that touches a `Recording`'s stored state:
//! - The entity itself and its two independent stage statuses
//! - The `RecordingStore` trait (atomic persistence operations) with an
//!   in-memory implementation
//! - The `LifecycleManager`, which enforces valid status transitions and is
//!   the only component the pipeline stages write through

mod lifecycle;
mod model;
mod store;

pub use lifecycle::LifecycleManager;
pub use model::{Recording, Stage, StageStatus};
pub use store::{MemoryRecordingStore, RecordingStore, StoreError};
