//! Workflow context types.

mod workflow;

pub use workflow::WorkflowContext;
