//! The stage pipeline engine.

use super::dispatch::dispatch;
use super::{AdvancePredicates, EngineBuilder};
use crate::collaborators::WorkflowGenerator;
use crate::config::WorkflowConfig;
use crate::context::WorkflowContext;
use crate::core::{RunOutcome, StageId, WorkflowEvent, WorkflowStage};
use crate::errors::GenerationError;
use crate::events::EventSink;
use crate::observability::StageTimer;
use crate::observe::{Publisher, Subscription};
use crate::utils::generate_uuid_v7;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What observers see after every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    /// Run that produced this state; `None` before the first run.
    pub run_id: Option<Uuid>,
    /// Every stage in pipeline order.
    pub stages: Vec<WorkflowStage>,
    /// Context accumulated so far.
    pub context: WorkflowContext,
}

#[derive(Debug)]
struct EngineState {
    run_id: Option<Uuid>,
    stages: Vec<WorkflowStage>,
    context: WorkflowContext,
}

impl EngineState {
    fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            run_id: self.run_id,
            stages: self.stages.clone(),
            context: self.context.clone(),
        }
    }
}

/// Runs the five generation stages in order against one shared context.
///
/// Each run resets every stage to pending, then drives them one at a time:
/// pending, running, then completed or error. Stage failures end the run
/// and are reported through the returned [`RunOutcome`] and the published
/// stage state, never as an `Err`.
///
/// Starting a run while another is suspended on a collaborator call
/// supersedes it: the older run leaves state untouched from then on and
/// returns [`RunOutcome::Superseded`].
pub struct WorkflowEngine {
    generator: Arc<dyn WorkflowGenerator>,
    predicates: AdvancePredicates,
    event_sink: Arc<dyn EventSink>,
    config: WorkflowConfig,
    state: Mutex<EngineState>,
    publisher: Publisher<WorkflowSnapshot>,
}

impl WorkflowEngine {
    /// Starts building an engine around `generator`.
    pub fn builder(generator: impl WorkflowGenerator + 'static) -> EngineBuilder {
        EngineBuilder::new(Arc::new(generator))
    }

    /// An engine with default predicates, no event sink and default config.
    pub fn new(generator: impl WorkflowGenerator + 'static) -> Self {
        Self::builder(generator).build()
    }

    pub(crate) fn from_parts(
        generator: Arc<dyn WorkflowGenerator>,
        predicates: AdvancePredicates,
        event_sink: Arc<dyn EventSink>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            generator,
            predicates,
            event_sink,
            config,
            state: Mutex::new(EngineState {
                run_id: None,
                stages: WorkflowStage::pipeline(),
                context: WorkflowContext::default(),
            }),
            publisher: Publisher::new(),
        }
    }

    /// Registers an observer called after every transition.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Arc<WorkflowSnapshot>) + Send + Sync + 'static,
    {
        self.publisher.subscribe(observer)
    }

    /// Copy of every stage.
    #[must_use]
    pub fn get_stages(&self) -> Vec<WorkflowStage> {
        self.state.lock().stages.clone()
    }

    /// Copy of the accumulated context.
    #[must_use]
    pub fn get_context(&self) -> WorkflowContext {
        self.state.lock().context.clone()
    }

    /// Copy of the full observable state.
    #[must_use]
    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.state.lock().snapshot()
    }

    /// Id of the most recent run.
    #[must_use]
    pub fn current_run_id(&self) -> Option<Uuid> {
        self.state.lock().run_id
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Runs the pipeline for `user_input` until it completes or halts.
    pub async fn start_workflow(&self, user_input: impl Into<String>) -> RunOutcome {
        let user_input = user_input.into();
        let run_id = generate_uuid_v7();
        let run_timer = StageTimer::start(self.config.pipeline_name.clone());

        self.publisher.publish_with(|| {
            let mut state = self.state.lock();
            state.run_id = Some(run_id);
            for stage in &mut state.stages {
                stage.reset();
            }
            state.context = WorkflowContext::new(user_input);
            Some(Arc::new(state.snapshot()))
        });

        info!(run_id = %run_id, pipeline = %self.config.pipeline_name, "Workflow started");
        self.emit(&WorkflowEvent::workflow_started(
            run_id,
            &self.config.pipeline_name,
        ));

        for stage in StageId::ALL {
            let timer = StageTimer::start(stage.as_str());

            if self
                .transition(run_id, |state| state.stages[stage.index()].mark_running())
                .is_none()
            {
                return self.superseded(run_id, stage);
            }
            info!(run_id = %run_id, stage = %stage, "{}", stage.phase_label());
            self.emit(&WorkflowEvent::stage_started(run_id, stage));

            if let Some(delay) = self.config.stage_delay() {
                tokio::time::sleep(delay).await;
            }

            let context = self.get_context();
            let result = match dispatch(self.generator.as_ref(), stage, &context).await {
                Ok(product) => product
                    .to_value()
                    .map(|value| (product, value))
                    .map_err(|e| GenerationError::unencodable(stage, &e)),
                Err(e) => Err(e),
            };
            let duration_ms = timer.finish();

            match result {
                Ok((product, value)) => {
                    let advance = self.transition(run_id, |state| {
                        product.merge_into(&mut state.context);
                        state.stages[stage.index()].mark_completed(value);
                        self.predicates.should_advance(stage, &state.context)
                    });
                    let Some(advance) = advance else {
                        return self.superseded(run_id, stage);
                    };

                    info!(run_id = %run_id, stage = %stage, duration_ms, "Stage completed");
                    self.emit(&WorkflowEvent::stage_completed(run_id, stage, duration_ms));

                    if stage.is_terminal() {
                        break;
                    }
                    if !advance {
                        info!(run_id = %run_id, stage = %stage, "Empty result, halting workflow");
                        self.emit(&WorkflowEvent::workflow_halted(run_id, stage));
                        return RunOutcome::HaltedEmpty { stage };
                    }
                }
                Err(err) => {
                    let message = err.message;
                    if self
                        .transition(run_id, |state| {
                            state.stages[stage.index()].mark_error(message.clone());
                        })
                        .is_none()
                    {
                        return self.superseded(run_id, stage);
                    }

                    warn!(
                        run_id = %run_id,
                        stage = %stage,
                        status = ?err.status,
                        duration_ms,
                        "Stage failed: {}",
                        message
                    );
                    self.emit(&WorkflowEvent::stage_failed(
                        run_id,
                        stage,
                        &message,
                        duration_ms,
                    ));
                    return RunOutcome::Failed { stage, message };
                }
            }
        }

        let duration_ms = run_timer.finish();
        info!(run_id = %run_id, duration_ms, "Workflow completed");
        self.emit(&WorkflowEvent::workflow_completed(run_id, duration_ms));
        RunOutcome::Completed
    }

    /// Applies `mutate` and publishes, unless `run_id` is no longer current.
    fn transition<R>(&self, run_id: Uuid, mutate: impl FnOnce(&mut EngineState) -> R) -> Option<R> {
        let mut applied = None;
        self.publisher.publish_with(|| {
            let mut state = self.state.lock();
            if state.run_id != Some(run_id) {
                return None;
            }
            applied = Some(mutate(&mut state));
            Some(Arc::new(state.snapshot()))
        });
        applied
    }

    fn superseded(&self, run_id: Uuid, stage: StageId) -> RunOutcome {
        info!(run_id = %run_id, stage = %stage, "Workflow superseded by a newer run");
        self.emit(&WorkflowEvent::workflow_superseded(run_id, stage));
        RunOutcome::Superseded { stage }
    }

    fn emit(&self, event: &WorkflowEvent) {
        debug!(event_type = %event.event_type, "Emitting workflow event");
        self.event_sink.try_emit(event);
    }
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("config", &self.config)
            .field("predicates", &self.predicates)
            .field("publisher", &self.publisher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageStatus;
    use crate::testing::ScriptedGenerator;

    #[test]
    fn test_initial_state() {
        let engine = WorkflowEngine::new(ScriptedGenerator::new());
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.run_id, None);
        assert_eq!(snapshot.stages.len(), 5);
        assert!(snapshot.stages.iter().all(|s| s.status == StageStatus::Pending));
        assert_eq!(engine.get_context(), WorkflowContext::default());
    }

    #[tokio::test]
    async fn test_copies_do_not_alias_state() {
        let engine = WorkflowEngine::new(ScriptedGenerator::new());
        engine.start_workflow("x").await;

        let mut stages = engine.get_stages();
        stages[0].status = StageStatus::Error;
        let mut context = engine.get_context();
        context.pain_analysis = None;

        assert_eq!(engine.get_stages()[0].status, StageStatus::Completed);
        assert!(engine.get_context().pain_analysis.is_some());
    }

    #[tokio::test]
    async fn test_deployment_result_is_stage_only() {
        let engine = WorkflowEngine::new(ScriptedGenerator::new());
        let outcome = engine.start_workflow("x").await;

        assert_eq!(outcome, RunOutcome::Completed);
        let stages = engine.get_stages();
        let plan = stages[StageId::DeploymentPrep.index()].result.as_ref().unwrap();
        assert_eq!(plan["status"], "ready");
        assert_eq!(engine.get_context().filled_fields(), 4);
    }

    #[tokio::test]
    async fn test_run_id_changes_per_run() {
        let engine = WorkflowEngine::new(ScriptedGenerator::new());
        engine.start_workflow("a").await;
        let first = engine.current_run_id().unwrap();
        engine.start_workflow("b").await;
        let second = engine.current_run_id().unwrap();

        assert_ne!(first, second);
        assert_eq!(engine.get_context().user_input, "b");
    }
}
