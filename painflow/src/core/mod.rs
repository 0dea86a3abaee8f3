//! Core domain model types for painflow.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Stage identifiers and status
//! - The per-stage record published to observers
//! - Lifecycle events and run outcomes

mod event;
mod outcome;
mod stage;
mod stage_id;
mod status;

pub use event::WorkflowEvent;
pub use outcome::RunOutcome;
pub use stage::WorkflowStage;
pub use stage_id::StageId;
pub use status::StageStatus;
