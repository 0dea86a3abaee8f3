//! Workflow lifecycle events for the logging side channel.

use super::StageId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// An event emitted by the engine while a run progresses.
///
/// Events feed an [`EventSink`](crate::events::EventSink); they are not the
/// observer channel, which carries full snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEvent {
    /// The event type (e.g., "stage.started", "workflow.halted").
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the event occurred (ISO 8601).
    pub timestamp: String,

    /// The event payload data.
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
}

impl WorkflowEvent {
    /// Creates a new event.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp: crate::utils::iso_timestamp(),
            data: HashMap::new(),
        }
    }

    /// Adds a data field to the event.
    #[must_use]
    pub fn add_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// The payload as a JSON object, for sinks.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        let mut map: serde_json::Map<String, serde_json::Value> =
            self.data.clone().into_iter().collect();
        map.insert("timestamp".to_string(), serde_json::json!(self.timestamp));
        serde_json::Value::Object(map)
    }

    /// Creates a "workflow.started" event.
    #[must_use]
    pub fn workflow_started(run_id: Uuid, pipeline: &str) -> Self {
        Self::new("workflow.started")
            .add_data("run_id", serde_json::json!(run_id))
            .add_data("pipeline", serde_json::json!(pipeline))
    }

    /// Creates a "stage.started" event.
    #[must_use]
    pub fn stage_started(run_id: Uuid, stage: StageId) -> Self {
        Self::new("stage.started")
            .add_data("run_id", serde_json::json!(run_id))
            .add_data("stage", serde_json::json!(stage))
    }

    /// Creates a "stage.completed" event.
    #[must_use]
    pub fn stage_completed(run_id: Uuid, stage: StageId, duration_ms: f64) -> Self {
        Self::new("stage.completed")
            .add_data("run_id", serde_json::json!(run_id))
            .add_data("stage", serde_json::json!(stage))
            .add_data("duration_ms", serde_json::json!(duration_ms))
    }

    /// Creates a "stage.failed" event.
    #[must_use]
    pub fn stage_failed(run_id: Uuid, stage: StageId, error: &str, duration_ms: f64) -> Self {
        Self::new("stage.failed")
            .add_data("run_id", serde_json::json!(run_id))
            .add_data("stage", serde_json::json!(stage))
            .add_data("error", serde_json::json!(error))
            .add_data("duration_ms", serde_json::json!(duration_ms))
    }

    /// Creates a "workflow.halted" event for an empty-result stop.
    #[must_use]
    pub fn workflow_halted(run_id: Uuid, stage: StageId) -> Self {
        Self::new("workflow.halted")
            .add_data("run_id", serde_json::json!(run_id))
            .add_data("stage", serde_json::json!(stage))
            .add_data("reason", serde_json::json!("empty result"))
    }

    /// Creates a "workflow.completed" event.
    #[must_use]
    pub fn workflow_completed(run_id: Uuid, duration_ms: f64) -> Self {
        Self::new("workflow.completed")
            .add_data("run_id", serde_json::json!(run_id))
            .add_data("duration_ms", serde_json::json!(duration_ms))
    }

    /// Creates a "workflow.superseded" event.
    #[must_use]
    pub fn workflow_superseded(run_id: Uuid, stage: StageId) -> Self {
        Self::new("workflow.superseded")
            .add_data("run_id", serde_json::json!(run_id))
            .add_data("stage", serde_json::json!(stage))
    }
}
