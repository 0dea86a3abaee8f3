//! The fixed, ordered set of pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one pipeline stage. Declaration order is pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageId {
    /// Extracts pains from the free-text problem.
    PainAnalysis,
    /// Designs solutions for the identified pains.
    SolutionDesign,
    /// Turns solutions into agent specifications.
    AgentGeneration,
    /// Produces a deployment manifest per agent.
    ManifestGeneration,
    /// Builds the deployment plan and script. Terminal.
    DeploymentPrep,
}

impl StageId {
    /// All stages in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::PainAnalysis,
        Self::SolutionDesign,
        Self::AgentGeneration,
        Self::ManifestGeneration,
        Self::DeploymentPrep,
    ];

    /// The wire identifier, e.g. `pain-analysis`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PainAnalysis => "pain-analysis",
            Self::SolutionDesign => "solution-design",
            Self::AgentGeneration => "agent-generation",
            Self::ManifestGeneration => "manifest-generation",
            Self::DeploymentPrep => "deployment-prep",
        }
    }

    /// Human label shown next to the stage.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PainAnalysis => "Pain Analysis",
            Self::SolutionDesign => "Solution Design",
            Self::AgentGeneration => "Agent Generation",
            Self::ManifestGeneration => "Manifest Generation",
            Self::DeploymentPrep => "Deployment Preparation",
        }
    }

    /// Progress label for a running stage.
    #[must_use]
    pub const fn phase_label(&self) -> &'static str {
        match self {
            Self::PainAnalysis => "pain thinking",
            Self::SolutionDesign => "solution thinking",
            Self::AgentGeneration => "agent thinking",
            Self::ManifestGeneration => "manifest thinking",
            Self::DeploymentPrep => "deployment thinking",
        }
    }

    /// Message used when the stage's endpoint answers with a non-success status.
    #[must_use]
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::PainAnalysis => "Pain analysis failed",
            Self::SolutionDesign => "Solution design failed",
            Self::AgentGeneration => "Agent generation failed",
            Self::ManifestGeneration => "Manifest generation failed",
            Self::DeploymentPrep => "Deployment preparation failed",
        }
    }

    /// Position in the pipeline, starting at zero.
    #[must_use]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// The stage that runs after this one, if any.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Returns true for the last stage of the pipeline.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown stage id: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order() {
        let ids: Vec<&str> = StageId::ALL.iter().map(StageId::as_str).collect();
        assert_eq!(
            ids,
            vec![
                "pain-analysis",
                "solution-design",
                "agent-generation",
                "manifest-generation",
                "deployment-prep",
            ]
        );
    }

    #[test]
    fn test_next_and_terminal() {
        assert_eq!(StageId::PainAnalysis.next(), Some(StageId::SolutionDesign));
        assert_eq!(StageId::ManifestGeneration.next(), Some(StageId::DeploymentPrep));
        assert_eq!(StageId::DeploymentPrep.next(), None);
        assert!(StageId::DeploymentPrep.is_terminal());
        assert!(!StageId::AgentGeneration.is_terminal());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for id in StageId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("agent-generation".parse::<StageId>(), Ok(StageId::AgentGeneration));
        assert!("agents".parse::<StageId>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(StageId::DeploymentPrep.label(), "Deployment Preparation");
        assert_eq!(StageId::SolutionDesign.phase_label(), "solution thinking");
        assert_eq!(StageId::PainAnalysis.failure_message(), "Pain analysis failed");
    }
}
