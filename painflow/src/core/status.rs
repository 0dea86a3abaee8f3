//! Stage status enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The execution status of a pipeline stage within one run.
///
/// A stage moves `Pending -> Running -> (Completed | Error)` at most once per
/// run; only a new run puts it back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage has not started in the current run.
    #[default]
    Pending,
    /// Stage's collaborator call is in flight.
    Running,
    /// Stage finished and produced a result.
    Completed,
    /// Stage's collaborator call failed.
    Error,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl StageStatus {
    /// Returns true if the status represents a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Returns true if moving from `self` to `next` is a legal transition.
    ///
    /// Staying in place is legal; so is the reset of any status to `Pending`
    /// that starts a new run.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        match (self, next) {
            (a, b) if *a == b => true,
            (_, Self::Pending) => true,
            (Self::Pending, Self::Running) => true,
            (Self::Running, Self::Completed | Self::Error) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_status_display() {
        assert_eq!(StageStatus::Pending.to_string(), "pending");
        assert_eq!(StageStatus::Running.to_string(), "running");
        assert_eq!(StageStatus::Completed.to_string(), "completed");
        assert_eq!(StageStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_stage_status_is_terminal() {
        assert!(StageStatus::Completed.is_terminal());
        assert!(StageStatus::Error.is_terminal());
        assert!(!StageStatus::Pending.is_terminal());
        assert!(!StageStatus::Running.is_terminal());
    }

    #[test]
    fn test_transitions() {
        assert!(StageStatus::Pending.can_transition_to(StageStatus::Running));
        assert!(StageStatus::Running.can_transition_to(StageStatus::Completed));
        assert!(StageStatus::Running.can_transition_to(StageStatus::Error));
        assert!(StageStatus::Error.can_transition_to(StageStatus::Pending));

        assert!(!StageStatus::Pending.can_transition_to(StageStatus::Completed));
        assert!(!StageStatus::Completed.can_transition_to(StageStatus::Running));
        assert!(!StageStatus::Error.can_transition_to(StageStatus::Completed));
    }

    #[test]
    fn test_stage_status_serialize() {
        let json = serde_json::to_string(&StageStatus::Completed).unwrap();
        assert_eq!(json, r#""completed""#);

        let deserialized: StageStatus = serde_json::from_str(r#""error""#).unwrap();
        assert_eq!(deserialized, StageStatus::Error);
    }
}
