//! Per-stage state record published to observers.

use super::{StageId, StageStatus};
use serde::{Deserialize, Serialize};

/// One step of the pipeline as seen by observers.
///
/// `result` is only present while `Completed`, `error` only while `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStage {
    /// Stable identifier.
    pub id: StageId,
    /// Human label.
    pub name: String,
    /// Current status.
    pub status: StageStatus,
    /// Payload produced by the collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowStage {
    /// Creates a pending stage.
    #[must_use]
    pub fn pending(id: StageId) -> Self {
        Self {
            id,
            name: id.label().to_string(),
            status: StageStatus::Pending,
            result: None,
            error: None,
        }
    }

    /// The full pipeline, every stage pending.
    #[must_use]
    pub fn pipeline() -> Vec<Self> {
        StageId::ALL.into_iter().map(Self::pending).collect()
    }

    pub(crate) fn reset(&mut self) {
        self.status = StageStatus::Pending;
        self.result = None;
        self.error = None;
    }

    pub(crate) fn mark_running(&mut self) {
        self.status = StageStatus::Running;
    }

    pub(crate) fn mark_completed(&mut self, result: serde_json::Value) {
        self.status = StageStatus::Completed;
        self.result = Some(result);
        self.error = None;
    }

    pub(crate) fn mark_error(&mut self, message: impl Into<String>) {
        self.status = StageStatus::Error;
        self.result = None;
        self.error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_is_all_pending() {
        let stages = WorkflowStage::pipeline();
        assert_eq!(stages.len(), 5);
        assert!(stages.iter().all(|s| s.status == StageStatus::Pending));
        assert_eq!(stages[3].name, "Manifest Generation");
    }

    #[test]
    fn test_result_and_error_are_exclusive() {
        let mut stage = WorkflowStage::pending(StageId::PainAnalysis);
        stage.mark_running();
        stage.mark_error("boom");
        assert_eq!(stage.error.as_deref(), Some("boom"));
        assert!(stage.result.is_none());

        stage.reset();
        assert_eq!(stage.status, StageStatus::Pending);
        assert!(stage.error.is_none());

        stage.mark_running();
        stage.mark_completed(serde_json::json!({"pains": []}));
        assert!(stage.error.is_none());
        assert!(stage.result.is_some());
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let stage = WorkflowStage::pending(StageId::DeploymentPrep);
        let json = serde_json::to_value(&stage).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "deployment-prep",
                "name": "Deployment Preparation",
                "status": "pending"
            })
        );
    }
}
