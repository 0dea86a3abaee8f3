//! The stage pipeline engine.
//!
//! This module provides:
//! - [`WorkflowEngine`], which drives the five generation stages in order
//! - [`AdvancePredicates`], the per-stage "anything to build on" checks
//! - [`WorkflowSnapshot`], the state published after every transition

mod builder;
mod dispatch;
mod engine;
mod predicates;


pub use builder::EngineBuilder;
pub use engine::{WorkflowEngine, WorkflowSnapshot};
pub use predicates::{AdvancePredicate, AdvancePredicates};
