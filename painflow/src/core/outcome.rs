//! Terminal outcome of one pipeline run.

use super::StageId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a run ended.
///
/// Stage failures are reported here and in the stage state, never as an
/// `Err` from [`WorkflowEngine::start_workflow`](crate::pipeline::WorkflowEngine::start_workflow).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every stage completed.
    Completed,
    /// `stage` completed but produced nothing to build on; later stages stay pending.
    HaltedEmpty {
        /// The last stage that ran.
        stage: StageId,
    },
    /// `stage`'s collaborator failed; later stages stay pending.
    Failed {
        /// The failing stage.
        stage: StageId,
        /// The collaborator's message.
        message: String,
    },
    /// A newer run started on the same engine while `stage` was in flight.
    Superseded {
        /// The stage in flight when the run was replaced.
        stage: StageId,
    },
}

impl RunOutcome {
    /// Returns true if every stage completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if a stage failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The stage the run stopped at, if it stopped early.
    #[must_use]
    pub fn stopped_at(&self) -> Option<StageId> {
        match self {
            Self::Completed => None,
            Self::HaltedEmpty { stage } | Self::Failed { stage, .. } | Self::Superseded { stage } => {
                Some(*stage)
            }
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::HaltedEmpty { stage } => write!(f, "halted after {stage}: empty result"),
            Self::Failed { stage, message } => write!(f, "{stage} failed: {message}"),
            Self::Superseded { stage } => write!(f, "superseded during {stage}"),
        }
    }
}
