//! Deployment preparation output.

use super::ServiceManifest;
use serde::{Deserialize, Serialize};

/// Deploy and build instructions for one agent service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceDeployment {
    /// Service name.
    pub name: String,
    /// Image to build, push and deploy.
    pub image: String,
    /// Manifest the service was generated from.
    pub manifest: ServiceManifest,
    /// `gcloud run deploy` invocation.
    pub deploy_command: String,
    /// `docker build` and `docker push` invocation.
    pub build_command: String,
}

/// Result of the terminal `deployment-prep` stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentPlan {
    /// Cloud project to deploy into.
    pub project_id: String,
    /// Cloud region.
    pub region: String,
    /// One entry per agent.
    pub services: Vec<ServiceDeployment>,
    /// Bash script deploying every service in order.
    pub deployment_script: String,
    /// `ready` once the plan is complete.
    pub status: String,
}
