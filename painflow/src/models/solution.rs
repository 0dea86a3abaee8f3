//! Solution design output.

use serde::{Deserialize, Serialize};

/// A proposed solution addressing one or more pains.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Solution {
    /// Identifier such as `S-001`.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// What the solution does.
    pub description: String,
    /// Pains this solution addresses.
    pub pain_ids: Vec<String>,
    /// How it gets built.
    pub approach: String,
    /// Why it fits the problem.
    pub background: String,
    /// Component outline.
    pub architecture: String,
    /// Feasibility assessment.
    pub feasibility: String,
}

/// Design-level view across all solutions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignStructure {
    /// Principles every solution follows.
    pub design_principles: Vec<String>,
    /// Shared technical direction.
    pub technical_approach: String,
    /// Known risks.
    pub risk_assessment: Vec<String>,
    /// How success is measured.
    pub success_metrics: Vec<String>,
}

/// Result of the `solution-design` stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolutionDesign {
    /// Designed solutions.
    pub solutions: Vec<Solution>,
    /// Design-level analysis.
    pub structural_analysis: DesignStructure,
}

impl SolutionDesign {
    /// Returns true if at least one solution was designed.
    #[must_use]
    pub fn has_solutions(&self) -> bool {
        !self.solutions.is_empty()
    }

    /// Solutions that address the given pain.
    pub fn addressing<'a>(&'a self, pain_id: &'a str) -> impl Iterator<Item = &'a Solution> + 'a {
        self.solutions
            .iter()
            .filter(move |s| s.pain_ids.iter().any(|id| id == pain_id))
    }
}
