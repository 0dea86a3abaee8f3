//! In-process deployment preparation.
//!
//! Deployment prep needs no model call: the plan is a pure function of the
//! manifests, so it can be served locally instead of through an endpoint.

use super::{
    AgentGenerationRequest, DeploymentPrepRequest, ManifestRequest, PainAnalysisRequest,
    SolutionDesignRequest, WorkflowGenerator,
};
use crate::config::DeploymentSettings;
use crate::errors::GenerationError;
use crate::models::{
    AgentGeneration, AgentManifest, DeploymentPlan, ManifestBundle, PainAnalysis,
    ServiceDeployment, SolutionDesign,
};
use async_trait::async_trait;
use tracing::debug;

/// Builds the deployment plan for every agent manifest in `bundle`.
#[must_use]
pub fn prepare_deployment(bundle: &ManifestBundle, settings: &DeploymentSettings) -> DeploymentPlan {
    let services = bundle
        .agents
        .iter()
        .map(|agent| ServiceDeployment {
            name: agent.name.clone(),
            image: agent.manifest.spec.image.clone(),
            manifest: agent.manifest.clone(),
            deploy_command: deploy_command(agent, settings),
            build_command: build_command(agent),
        })
        .collect();

    DeploymentPlan {
        project_id: settings.project_id.clone(),
        region: settings.region.clone(),
        services,
        deployment_script: deployment_script(&bundle.agents, settings),
        status: "ready".to_string(),
    }
}

fn deploy_command(agent: &AgentManifest, settings: &DeploymentSettings) -> String {
    format!(
        "gcloud run deploy {} --image {} --region {} --platform managed --allow-unauthenticated",
        agent.name, agent.manifest.spec.image, settings.region
    )
}

fn build_command(agent: &AgentManifest) -> String {
    let image = &agent.manifest.spec.image;
    format!("docker build -t {image} . && docker push {image}")
}

fn deployment_script(agents: &[AgentManifest], settings: &DeploymentSettings) -> String {
    let commands = agents
        .iter()
        .map(|agent| {
            format!(
                "echo \"Deploying {}...\"\n{}",
                agent.name,
                deploy_command(agent, settings)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "#!/bin/bash\nset -e\n\necho \"Starting deployment of AI agents...\"\n\n{commands}\n\necho \"All agents deployed successfully!\"\n"
    )
}

/// Wraps a generator and serves `deployment-prep` locally.
#[derive(Debug, Clone)]
pub struct LocalDeploymentPrep<G> {
    inner: G,
    settings: DeploymentSettings,
}

impl<G> LocalDeploymentPrep<G> {
    /// Wraps `inner`, answering deployment prep with `settings`.
    pub fn new(inner: G, settings: DeploymentSettings) -> Self {
        Self { inner, settings }
    }

    /// Returns the wrapped generator.
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: WorkflowGenerator> WorkflowGenerator for LocalDeploymentPrep<G> {
    async fn analyze_pains(&self, request: PainAnalysisRequest) -> Result<PainAnalysis, GenerationError> {
        self.inner.analyze_pains(request).await
    }

    async fn design_solutions(
        &self,
        request: SolutionDesignRequest,
    ) -> Result<SolutionDesign, GenerationError> {
        self.inner.design_solutions(request).await
    }

    async fn generate_agents(
        &self,
        request: AgentGenerationRequest,
    ) -> Result<AgentGeneration, GenerationError> {
        self.inner.generate_agents(request).await
    }

    async fn generate_manifests(&self, request: ManifestRequest) -> Result<ManifestBundle, GenerationError> {
        self.inner.generate_manifests(request).await
    }

    async fn prepare_deployment(
        &self,
        request: DeploymentPrepRequest,
    ) -> Result<DeploymentPlan, GenerationError> {
        debug!(services = request.manifest.agents.len(), "Preparing deployment locally");
        Ok(prepare_deployment(&request.manifest, &self.settings))
    }
}
