//! Accumulated output of one pipeline run.

use crate::models::{AgentGeneration, ManifestBundle, PainAnalysis, SolutionDesign};
use serde::{Deserialize, Serialize};

/// Structured data produced by completed stages, plus the original input.
///
/// Within a run fields are only ever filled in, never cleared. A new run
/// replaces the whole value with [`WorkflowContext::new`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowContext {
    /// The free-text business problem the run started from.
    pub user_input: String,
    /// Output of `pain-analysis`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_analysis: Option<PainAnalysis>,
    /// Output of `solution-design`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_design: Option<SolutionDesign>,
    /// Output of `agent-generation`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_generation: Option<AgentGeneration>,
    /// Output of `manifest-generation`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestBundle>,
}

impl WorkflowContext {
    /// A fresh context seeded only with the user's input.
    #[must_use]
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            ..Self::default()
        }
    }

    /// Number of stage outputs recorded so far.
    #[must_use]
    pub fn filled_fields(&self) -> usize {
        usize::from(self.pain_analysis.is_some())
            + usize::from(self.solution_design.is_some())
            + usize::from(self.agent_generation.is_some())
            + usize::from(self.manifest.is_some())
    }
}
