//! Generation collaborators consumed by the pipeline engine.
//!
//! The engine only knows the [`WorkflowGenerator`] trait. Implementations:
//! - [`HttpGenerator`] posts to the hosted workflow endpoints (feature `http`)
//! - [`LocalDeploymentPrep`] answers `deployment-prep` in-process
//! - [`ScriptedGenerator`](crate::testing::ScriptedGenerator) for tests

mod deployment;
#[cfg(feature = "http")]
mod http;
mod requests;

pub use deployment::{prepare_deployment, LocalDeploymentPrep};
#[cfg(feature = "http")]
pub use http::HttpGenerator;
pub use requests::{
    AgentGenerationRequest, DeploymentPrepRequest, ManifestRequest, PainAnalysisRequest,
    SolutionDesignRequest,
};

use crate::errors::GenerationError;
use crate::models::{AgentGeneration, DeploymentPlan, ManifestBundle, PainAnalysis, SolutionDesign};
use async_trait::async_trait;
use std::sync::Arc;

/// One asynchronous generation call per pipeline stage.
///
/// Implementations validate their own output; the engine treats any `Err`
/// as the stage failing and uses its message verbatim.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowGenerator: Send + Sync {
    /// `pain-analysis`: extract pains from the user's problem statement.
    async fn analyze_pains(&self, request: PainAnalysisRequest) -> Result<PainAnalysis, GenerationError>;

    /// `solution-design`: propose solutions for the pains.
    async fn design_solutions(
        &self,
        request: SolutionDesignRequest,
    ) -> Result<SolutionDesign, GenerationError>;

    /// `agent-generation`: derive agent specifications from the solutions.
    async fn generate_agents(
        &self,
        request: AgentGenerationRequest,
    ) -> Result<AgentGeneration, GenerationError>;

    /// `manifest-generation`: one service manifest per agent.
    async fn generate_manifests(&self, request: ManifestRequest) -> Result<ManifestBundle, GenerationError>;

    /// `deployment-prep`: build the deployment plan.
    async fn prepare_deployment(
        &self,
        request: DeploymentPrepRequest,
    ) -> Result<DeploymentPlan, GenerationError>;
}

#[async_trait]
impl<G: WorkflowGenerator + ?Sized> WorkflowGenerator for Arc<G> {
    async fn analyze_pains(&self, request: PainAnalysisRequest) -> Result<PainAnalysis, GenerationError> {
        (**self).analyze_pains(request).await
    }

    async fn design_solutions(
        &self,
        request: SolutionDesignRequest,
    ) -> Result<SolutionDesign, GenerationError> {
        (**self).design_solutions(request).await
    }

    async fn generate_agents(
        &self,
        request: AgentGenerationRequest,
    ) -> Result<AgentGeneration, GenerationError> {
        (**self).generate_agents(request).await
    }

    async fn generate_manifests(&self, request: ManifestRequest) -> Result<ManifestBundle, GenerationError> {
        (**self).generate_manifests(request).await
    }

    async fn prepare_deployment(
        &self,
        request: DeploymentPrepRequest,
    ) -> Result<DeploymentPlan, GenerationError> {
        (**self).prepare_deployment(request).await
    }
}
