//! Agent generation output.

use serde::{Deserialize, Serialize};

/// One agent to build and deploy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentSpec {
    /// Identifier such as `A-001`.
    pub id: String,
    /// Service name, also used for the container image.
    pub name: String,
    /// What the agent does.
    pub description: String,
    /// Tasks the agent can carry out.
    pub capabilities: Vec<String>,
    /// Solutions the agent implements.
    pub solution_ids: Vec<String>,
}

/// Result of the `agent-generation` stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentGeneration {
    /// Generated agents.
    pub agents: Vec<AgentSpec>,
}

impl AgentGeneration {
    /// Returns true if at least one agent was generated.
    #[must_use]
    pub fn has_agents(&self) -> bool {
        !self.agents.is_empty()
    }
}
