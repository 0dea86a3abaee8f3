//! Builder for [`WorkflowEngine`].

use super::{AdvancePredicates, WorkflowEngine};
use crate::collaborators::WorkflowGenerator;
use crate::config::WorkflowConfig;
use crate::context::WorkflowContext;
use crate::core::StageId;
use crate::events::{EventSink, NoOpEventSink};
use std::sync::Arc;

/// Configures an engine before construction.
pub struct EngineBuilder {
    generator: Arc<dyn WorkflowGenerator>,
    predicates: AdvancePredicates,
    event_sink: Arc<dyn EventSink>,
    config: WorkflowConfig,
}

impl EngineBuilder {
    /// Creates a builder with default predicates and config.
    #[must_use]
    pub fn new(generator: Arc<dyn WorkflowGenerator>) -> Self {
        Self {
            generator,
            predicates: AdvancePredicates::default(),
            event_sink: Arc::new(NoOpEventSink),
            config: WorkflowConfig::default(),
        }
    }

    /// Replaces the advance predicate for one stage.
    #[must_use]
    pub fn with_predicate<F>(mut self, stage: StageId, predicate: F) -> Self
    where
        F: Fn(&WorkflowContext) -> bool + Send + Sync + 'static,
    {
        self.predicates.set(stage, predicate);
        self
    }

    /// Replaces every advance predicate.
    #[must_use]
    pub fn with_predicates(mut self, predicates: AdvancePredicates) -> Self {
        self.predicates = predicates;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Sets the workflow configuration.
    #[must_use]
    pub fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the engine.
    #[must_use]
    pub fn build(self) -> WorkflowEngine {
        WorkflowEngine::from_parts(self.generator, self.predicates, self.event_sink, self.config)
    }
}

impl std::fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("predicates", &self.predicates)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;

    #[test]
    fn test_builder_applies_config() {
        let engine = WorkflowEngine::builder(ScriptedGenerator::new())
            .with_config(WorkflowConfig::new().with_pipeline_name("demo"))
            .with_predicate(StageId::PainAnalysis, |_| true)
            .build();

        assert_eq!(engine.config().pipeline_name, "demo");
    }
}
