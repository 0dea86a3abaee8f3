//! Testing utilities for painflow pipelines.
//!
//! This module provides:
//! - A scripted generator standing in for the hosted collaborators
//! - Fixtures describing one complete run
//! - Assertions over stage state and recorded snapshots

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_stage_completed, assert_stage_failed, assert_stages, assert_status_history_valid,
    SnapshotRecorder,
};
pub use fixtures::{
    empty_agent_generation, empty_pain_analysis, sample_agent_generation, sample_manifest_bundle,
    sample_pain_analysis, sample_solution_design, SAMPLE_INPUT,
};
pub use mocks::ScriptedGenerator;
