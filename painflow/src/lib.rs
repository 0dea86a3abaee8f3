//! # Painflow
//!
//! Turns a free-text business problem into deployable agents through a
//! fixed five-stage generation pipeline, and assembles streamed assistant
//! text for display.
//!
//! - **Stage pipeline engine**: runs pain analysis, solution design, agent
//!   generation, manifest generation and deployment prep in order, halting on
//!   empty results or the first failure
//! - **Live delta store**: coalesces high-frequency text fragments into at
//!   most one published snapshot per scheduler tick
//! - **Observer contract**: immutable `Arc` snapshots pushed to subscribers
//!   in state order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use painflow::prelude::*;
//!
//! let generator = HttpGenerator::new(HttpConfig::default())?;
//! let engine = WorkflowEngine::new(generator);
//! let _sub = engine.subscribe(|snapshot| println!("{:?}", snapshot.stages));
//!
//! match engine.start_workflow("Recruiters miss strong candidates").await {
//!     RunOutcome::Completed => println!("ready to deploy"),
//!     other => println!("stopped: {other}"),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod collaborators;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod live;
pub mod models;
pub mod observability;
pub mod observe;
pub mod pipeline;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "http")]
    pub use crate::collaborators::HttpGenerator;
    pub use crate::collaborators::{LocalDeploymentPrep, WorkflowGenerator};
    pub use crate::config::{HttpConfig, PainflowConfig, WorkflowConfig};
    pub use crate::context::WorkflowContext;
    pub use crate::core::{RunOutcome, StageId, StageStatus, WorkflowStage};
    pub use crate::errors::{GenerationError, PainflowError};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::live::{
        pump_stream, CoalescingScheduler, IntervalScheduler, LiveDeltaStore, LiveSnapshot,
        ManualScheduler,
    };
    pub use crate::observe::Subscription;
    pub use crate::pipeline::{AdvancePredicates, WorkflowEngine, WorkflowSnapshot};
}
