//! Pain analysis output.

use serde::{Deserialize, Serialize};

/// How much a pain hurts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks the business today.
    High,
    /// Costly but worked around.
    #[default]
    Medium,
    /// An irritation.
    Low,
}

/// One identified business pain, numbered `P-001`, `P-002`, ...
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pain {
    /// Identifier such as `P-001`.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// What goes wrong.
    pub description: String,
    /// How badly it hurts.
    pub severity: Severity,
    /// Business area, e.g. operations or hiring.
    pub category: String,
    /// Consequence for the business.
    pub impact: String,
    /// How often it occurs.
    pub frequency: String,
    /// Context the pain arises in.
    pub background: String,
    /// Underlying cause.
    pub root_cause: String,
}

/// Structural view of the problem space.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemStructure {
    /// Domain the problem belongs to.
    pub problem_domain: String,
    /// People affected by or owning the problem.
    pub stakeholders: Vec<String>,
    /// Limits any solution has to respect.
    pub constraints: Vec<String>,
    /// Systems or processes the problem depends on.
    pub dependencies: Vec<String>,
}

/// Result of the `pain-analysis` stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PainAnalysis {
    /// Identified pains, most important first.
    pub pains: Vec<Pain>,
    /// Structure of the problem space.
    pub structural_analysis: ProblemStructure,
}

impl PainAnalysis {
    /// Returns true if at least one pain was identified.
    #[must_use]
    pub fn has_pains(&self) -> bool {
        !self.pains.is_empty()
    }

    /// Pains rated high severity.
    pub fn high_severity(&self) -> impl Iterator<Item = &Pain> {
        self.pains.iter().filter(|p| p.severity == Severity::High)
    }
}
