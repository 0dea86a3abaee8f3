//! Per-stage advance predicates.
//!
//! After a non-terminal stage completes, the engine asks its predicate
//! whether the freshly merged context holds anything to build on. A `false`
//! answer halts the run without recording an error.

use crate::context::WorkflowContext;
use crate::core::StageId;
use crate::models::{AgentGeneration, ManifestBundle, PainAnalysis, SolutionDesign};
use std::collections::HashMap;
use std::sync::Arc;

/// Decides whether the run may continue past a stage.
pub type AdvancePredicate = Arc<dyn Fn(&WorkflowContext) -> bool + Send + Sync>;

/// Predicates keyed by the stage they guard.
///
/// A stage without a predicate always advances. The terminal stage's
/// predicate is never consulted.
#[derive(Clone)]
pub struct AdvancePredicates {
    predicates: HashMap<StageId, AdvancePredicate>,
}

impl Default for AdvancePredicates {
    fn default() -> Self {
        Self::empty()
            .with(StageId::PainAnalysis, |ctx| {
                ctx.pain_analysis.as_ref().is_some_and(PainAnalysis::has_pains)
            })
            .with(StageId::SolutionDesign, |ctx| {
                ctx.solution_design
                    .as_ref()
                    .is_some_and(SolutionDesign::has_solutions)
            })
            .with(StageId::AgentGeneration, |ctx| {
                ctx.agent_generation
                    .as_ref()
                    .is_some_and(AgentGeneration::has_agents)
            })
            .with(StageId::ManifestGeneration, |ctx| {
                ctx.manifest.as_ref().is_some_and(ManifestBundle::has_manifests)
            })
    }
}

impl AdvancePredicates {
    /// The default "produced at least one item" predicates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No predicates; every stage advances.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Replaces the predicate for `stage`.
    #[must_use]
    pub fn with<F>(mut self, stage: StageId, predicate: F) -> Self
    where
        F: Fn(&WorkflowContext) -> bool + Send + Sync + 'static,
    {
        self.set(stage, predicate);
        self
    }

    /// Replaces the predicate for `stage` in place.
    pub fn set<F>(&mut self, stage: StageId, predicate: F)
    where
        F: Fn(&WorkflowContext) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(stage, Arc::new(predicate));
    }

    /// Removes the predicate for `stage`, so it always advances.
    pub fn remove(&mut self, stage: StageId) {
        self.predicates.remove(&stage);
    }

    /// Returns true if `stage` has a predicate.
    #[must_use]
    pub fn has_predicate(&self, stage: StageId) -> bool {
        self.predicates.contains_key(&stage)
    }

    /// Evaluates the predicate for `stage` against `context`.
    #[must_use]
    pub fn should_advance(&self, stage: StageId, context: &WorkflowContext) -> bool {
        self.predicates
            .get(&stage)
            .map_or(true, |predicate| predicate(context))
    }
}

impl std::fmt::Debug for AdvancePredicates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stages: Vec<&StageId> = self.predicates.keys().collect();
        stages.sort();
        f.debug_struct("AdvancePredicates")
            .field("stages", &stages)
            .finish()
    }
}
