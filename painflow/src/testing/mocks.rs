//! Scripted generator for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use super::fixtures::{
    sample_agent_generation, sample_manifest_bundle, sample_pain_analysis, sample_solution_design,
};
use crate::collaborators::{
    prepare_deployment, AgentGenerationRequest, DeploymentPrepRequest, ManifestRequest,
    PainAnalysisRequest, SolutionDesignRequest, WorkflowGenerator,
};
use crate::config::DeploymentSettings;
use crate::core::StageId;
use crate::errors::GenerationError;
use crate::models::{AgentGeneration, DeploymentPlan, ManifestBundle, PainAnalysis, SolutionDesign};

#[derive(Debug, Clone)]
enum Script {
    Respond(serde_json::Value),
    Fail(GenerationError),
}

/// A generator whose answer per stage is set up front.
///
/// Stages without a script answer with the matching fixture, so
/// `ScriptedGenerator::new()` drives a run to completion. Every call is
/// recorded with the request body it received.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    scripts: HashMap<StageId, Script>,
    gates: HashMap<StageId, Arc<Notify>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(StageId, serde_json::Value)>>,
}

impl ScriptedGenerator {
    /// Creates a generator answering every stage with fixtures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `stage` with `response`.
    #[must_use]
    pub fn with_response<T: Serialize>(mut self, stage: StageId, response: &T) -> Self {
        let value = serde_json::to_value(response).unwrap_or(serde_json::Value::Null);
        self.scripts.insert(stage, Script::Respond(value));
        self
    }

    /// Fails `stage` with `message`.
    #[must_use]
    pub fn with_failure(mut self, stage: StageId, message: impl Into<String>) -> Self {
        self.scripts
            .insert(stage, Script::Fail(GenerationError::new(message)));
        self
    }

    /// Fails `stage` with a prepared error.
    #[must_use]
    pub fn with_error(mut self, stage: StageId, error: GenerationError) -> Self {
        self.scripts.insert(stage, Script::Fail(error));
        self
    }

    /// Holds `stage` until `gate` is notified.
    #[must_use]
    pub fn with_gate(mut self, stage: StageId, gate: Arc<Notify>) -> Self {
        self.gates.insert(stage, gate);
        self
    }

    /// Sleeps before every answer.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Stages called so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<StageId> {
        self.calls.lock().iter().map(|(stage, _)| *stage).collect()
    }

    /// Number of calls made for `stage`.
    #[must_use]
    pub fn call_count(&self, stage: StageId) -> usize {
        self.calls.lock().iter().filter(|(s, _)| *s == stage).count()
    }

    /// Request body of the most recent call for `stage`.
    #[must_use]
    pub fn last_request(&self, stage: StageId) -> Option<serde_json::Value> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|(s, _)| *s == stage)
            .map(|(_, body)| body.clone())
    }

    /// Forgets recorded calls.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    async fn answer<Req, Res>(
        &self,
        stage: StageId,
        request: &Req,
        fallback: impl FnOnce() -> Res,
    ) -> Result<Res, GenerationError>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        let body = serde_json::to_value(request).unwrap_or(serde_json::Value::Null);
        self.calls.lock().push((stage, body));

        if let Some(gate) = self.gates.get(&stage) {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.scripts.get(&stage) {
            Some(Script::Respond(value)) => serde_json::from_value(value.clone())
                .map_err(|e| GenerationError::new(format!("scripted {stage} response: {e}"))),
            Some(Script::Fail(error)) => Err(error.clone()),
            None => Ok(fallback()),
        }
    }
}

#[async_trait]
impl WorkflowGenerator for ScriptedGenerator {
    async fn analyze_pains(&self, request: PainAnalysisRequest) -> Result<PainAnalysis, GenerationError> {
        self.answer(StageId::PainAnalysis, &request, sample_pain_analysis)
            .await
    }

    async fn design_solutions(
        &self,
        request: SolutionDesignRequest,
    ) -> Result<SolutionDesign, GenerationError> {
        self.answer(StageId::SolutionDesign, &request, sample_solution_design)
            .await
    }

    async fn generate_agents(
        &self,
        request: AgentGenerationRequest,
    ) -> Result<AgentGeneration, GenerationError> {
        self.answer(StageId::AgentGeneration, &request, sample_agent_generation)
            .await
    }

    async fn generate_manifests(&self, request: ManifestRequest) -> Result<ManifestBundle, GenerationError> {
        self.answer(StageId::ManifestGeneration, &request, sample_manifest_bundle)
            .await
    }

    async fn prepare_deployment(
        &self,
        request: DeploymentPrepRequest,
    ) -> Result<DeploymentPlan, GenerationError> {
        let plan = prepare_deployment(&request.manifest, &DeploymentSettings::default());
        self.answer(StageId::DeploymentPrep, &request, move || plan)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::empty_agent_generation;

    #[tokio::test]
    async fn test_defaults_to_fixtures() {
        let generator = ScriptedGenerator::new();
        let analysis = generator
            .analyze_pains(PainAnalysisRequest {
                user_input: "x".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(analysis, sample_pain_analysis());
        assert_eq!(generator.calls(), vec![StageId::PainAnalysis]);
        assert_eq!(
            generator.last_request(StageId::PainAnalysis),
            Some(serde_json::json!({"userInput": "x"}))
        );
    }

    #[tokio::test]
    async fn test_scripted_response_and_failure() {
        let generator = ScriptedGenerator::new()
            .with_response(StageId::AgentGeneration, &empty_agent_generation())
            .with_failure(StageId::PainAnalysis, "rate limited");

        let err = generator
            .analyze_pains(PainAnalysisRequest {
                user_input: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "rate limited");

        let agents = generator
            .generate_agents(AgentGenerationRequest {
                user_input: "x".to_string(),
                pain_analysis: sample_pain_analysis(),
                solution_design: sample_solution_design(),
            })
            .await
            .unwrap();
        assert!(!agents.has_agents());
        assert_eq!(generator.call_count(StageId::AgentGeneration), 1);

        generator.reset();
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_gate_holds_answer() {
        let gate = Arc::new(Notify::new());
        let generator =
            Arc::new(ScriptedGenerator::new().with_gate(StageId::PainAnalysis, gate.clone()));

        let g = generator.clone();
        let handle = tokio::spawn(async move {
            g.analyze_pains(PainAnalysisRequest {
                user_input: "x".to_string(),
            })
            .await
        });

        tokio::task::yield_now().await;
        assert!(!handle.is_finished());
        gate.notify_one();
        assert!(handle.await.unwrap().is_ok());
    }
}
