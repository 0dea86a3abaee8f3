//! Error types for painflow.
//!
//! Two layers: [`GenerationError`] is what a collaborator hands back when a
//! single stage fails and never escapes the engine; [`PainflowError`] covers
//! everything around the core (configuration, transport, runtime wiring).

use crate::core::StageId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for painflow operations.
#[derive(Debug, Error)]
pub enum PainflowError {
    /// A collaborator call failed outside of a pipeline run.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The byte stream feeding a live session failed.
    #[error("Stream error: {0}")]
    Stream(String),

    /// A capability needed a runtime that is not available.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// HTTP transport error.
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PainflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Failure reported by a generation collaborator for one stage.
///
/// The message is shown to users verbatim as the stage's error text, so it
/// carries no prefix of its own.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct GenerationError {
    /// Human-readable failure reason.
    pub message: String,
    /// HTTP-style status code, when the collaborator answered with one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl GenerationError {
    /// Creates a new generation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Attaches the status code returned by the collaborator.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Error for a stage whose upstream context field is absent.
    #[must_use]
    pub fn missing_input(stage: StageId, field: &str) -> Self {
        Self::new(format!("missing {field} for {stage}"))
    }

    /// Error for a result that could not be encoded as the stage's payload.
    #[must_use]
    pub fn unencodable(stage: StageId, err: &serde_json::Error) -> Self {
        Self::new(format!("failed to encode {stage} result: {err}"))
    }
}
