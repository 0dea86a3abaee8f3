//! Test assertions for stage state and published snapshots.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::core::{StageId, StageStatus, WorkflowStage};
use crate::pipeline::WorkflowSnapshot;

/// Asserts that `history` only ever moves along legal transitions.
pub fn assert_status_history_valid(history: &[StageStatus]) {
    for pair in history.windows(2) {
        assert!(
            pair[0].can_transition_to(pair[1]),
            "Illegal transition {} -> {} in history {:?}",
            pair[0],
            pair[1],
            history
        );
    }
}

/// Asserts the status of every stage, in pipeline order.
pub fn assert_stages(stages: &[WorkflowStage], expected: &[StageStatus]) {
    let actual: Vec<StageStatus> = stages.iter().map(|s| s.status).collect();
    assert_eq!(
        actual, expected,
        "Expected statuses {expected:?}, got {actual:?}"
    );
}

/// Asserts that `stage` carries a result and no error.
pub fn assert_stage_completed(stages: &[WorkflowStage], stage: StageId) {
    let record = &stages[stage.index()];
    assert_eq!(record.status, StageStatus::Completed, "{stage} is {}", record.status);
    assert!(record.result.is_some(), "{stage} completed without a result");
    assert!(record.error.is_none(), "{stage} completed with an error");
}

/// Asserts that `stage` failed with exactly `message`.
pub fn assert_stage_failed(stages: &[WorkflowStage], stage: StageId, message: &str) {
    let record = &stages[stage.index()];
    assert_eq!(record.status, StageStatus::Error, "{stage} is {}", record.status);
    assert_eq!(record.error.as_deref(), Some(message));
    assert!(record.result.is_none(), "{stage} failed but kept a result");
}

/// Records every snapshot an engine publishes.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRecorder {
    snapshots: Arc<Mutex<Vec<Arc<WorkflowSnapshot>>>>,
}

impl SnapshotRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer to pass to `subscribe`.
    pub fn observer(&self) -> impl Fn(&Arc<WorkflowSnapshot>) + Send + Sync + 'static {
        let snapshots = self.snapshots.clone();
        move |snapshot| snapshots.lock().push(Arc::clone(snapshot))
    }

    /// All recorded snapshots.
    #[must_use]
    pub fn snapshots(&self) -> Vec<Arc<WorkflowSnapshot>> {
        self.snapshots.lock().clone()
    }

    /// Number of recorded snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.lock().is_empty()
    }

    /// Statuses `stage` went through, consecutive duplicates collapsed.
    #[must_use]
    pub fn status_history(&self, stage: StageId) -> Vec<StageStatus> {
        let mut history: Vec<StageStatus> = Vec::new();
        for snapshot in self.snapshots.lock().iter() {
            let status = snapshot.stages[stage.index()].status;
            if history.last() != Some(&status) {
                history.push(status);
            }
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_history() {
        assert_status_history_valid(&[
            StageStatus::Pending,
            StageStatus::Running,
            StageStatus::Completed,
            StageStatus::Pending,
            StageStatus::Running,
            StageStatus::Error,
        ]);
    }

    #[test]
    #[should_panic(expected = "Illegal transition")]
    fn test_invalid_history_panics() {
        assert_status_history_valid(&[StageStatus::Pending, StageStatus::Completed]);
    }

    #[test]
    fn test_assert_stages() {
        let stages = WorkflowStage::pipeline();
        assert_stages(&stages, &[StageStatus::Pending; 5]);
    }
}
