//! Routes a stage to its collaborator call.

use crate::collaborators::{
    AgentGenerationRequest, DeploymentPrepRequest, ManifestRequest, PainAnalysisRequest,
    SolutionDesignRequest, WorkflowGenerator,
};
use crate::context::WorkflowContext;
use crate::core::StageId;
use crate::errors::GenerationError;
use crate::models::{AgentGeneration, DeploymentPlan, ManifestBundle, PainAnalysis, SolutionDesign};

/// Typed output of one stage.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StageProduct {
    Pains(PainAnalysis),
    Solutions(SolutionDesign),
    Agents(AgentGeneration),
    Manifests(ManifestBundle),
    Deployment(DeploymentPlan),
}

impl StageProduct {
    /// JSON form stored as the stage's `result`.
    pub(crate) fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Pains(v) => serde_json::to_value(v),
            Self::Solutions(v) => serde_json::to_value(v),
            Self::Agents(v) => serde_json::to_value(v),
            Self::Manifests(v) => serde_json::to_value(v),
            Self::Deployment(v) => serde_json::to_value(v),
        }
    }

    /// Records the product in the context. The deployment plan is kept on
    /// the stage only.
    pub(crate) fn merge_into(self, context: &mut WorkflowContext) {
        match self {
            Self::Pains(v) => context.pain_analysis = Some(v),
            Self::Solutions(v) => context.solution_design = Some(v),
            Self::Agents(v) => context.agent_generation = Some(v),
            Self::Manifests(v) => context.manifest = Some(v),
            Self::Deployment(_) => {}
        }
    }
}

fn require<'a, T>(
    field: Option<&'a T>,
    stage: StageId,
    name: &str,
) -> Result<&'a T, GenerationError> {
    field.ok_or_else(|| GenerationError::missing_input(stage, name))
}

/// Builds `stage`'s request from `context` and calls the collaborator once.
pub(crate) async fn dispatch(
    generator: &dyn WorkflowGenerator,
    stage: StageId,
    context: &WorkflowContext,
) -> Result<StageProduct, GenerationError> {
    match stage {
        StageId::PainAnalysis => {
            let request = PainAnalysisRequest {
                user_input: context.user_input.clone(),
            };
            generator.analyze_pains(request).await.map(StageProduct::Pains)
        }
        StageId::SolutionDesign => {
            let request = SolutionDesignRequest {
                user_input: context.user_input.clone(),
                pain_analysis: require(context.pain_analysis.as_ref(), stage, "painAnalysis")?
                    .clone(),
            };
            generator
                .design_solutions(request)
                .await
                .map(StageProduct::Solutions)
        }
        StageId::AgentGeneration => {
            let request = AgentGenerationRequest {
                user_input: context.user_input.clone(),
                pain_analysis: require(context.pain_analysis.as_ref(), stage, "painAnalysis")?
                    .clone(),
                solution_design: require(context.solution_design.as_ref(), stage, "solutionDesign")?
                    .clone(),
            };
            generator.generate_agents(request).await.map(StageProduct::Agents)
        }
        StageId::ManifestGeneration => {
            let request = ManifestRequest {
                agent_generation: require(
                    context.agent_generation.as_ref(),
                    stage,
                    "agentGeneration",
                )?
                .clone(),
            };
            generator
                .generate_manifests(request)
                .await
                .map(StageProduct::Manifests)
        }
        StageId::DeploymentPrep => {
            let request = DeploymentPrepRequest {
                manifest: require(context.manifest.as_ref(), stage, "manifest")?.clone(),
            };
            generator
                .prepare_deployment(request)
                .await
                .map(StageProduct::Deployment)
        }
    }
}
