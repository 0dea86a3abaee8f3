//! Request bodies sent to each stage's collaborator.
//!
//! Each carries only the slice of the workflow context its stage consumes.

use crate::models::{AgentGeneration, ManifestBundle, PainAnalysis, SolutionDesign};
use serde::{Deserialize, Serialize};

/// Input for `pain-analysis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PainAnalysisRequest {
    /// The free-text business problem.
    pub user_input: String,
}

/// Input for `solution-design`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionDesignRequest {
    /// The free-text business problem.
    pub user_input: String,
    /// Output of `pain-analysis`.
    pub pain_analysis: PainAnalysis,
}

/// Input for `agent-generation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentGenerationRequest {
    /// The free-text business problem.
    pub user_input: String,
    /// Output of `pain-analysis`.
    pub pain_analysis: PainAnalysis,
    /// Output of `solution-design`.
    pub solution_design: SolutionDesign,
}

/// Input for `manifest-generation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRequest {
    /// Output of `agent-generation`.
    pub agent_generation: AgentGeneration,
}

/// Input for `deployment-prep`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPrepRequest {
    /// Output of `manifest-generation`.
    pub manifest: ManifestBundle,
}
