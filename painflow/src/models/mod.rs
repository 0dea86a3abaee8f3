//! Structured payloads exchanged with the generation collaborators.
//!
//! Field names follow the collaborators' camelCase JSON. Every field has a
//! default so partially filled responses still decode; validating them
//! against a schema is the collaborator's job.

mod agent;
mod chat;
mod deployment;
mod manifest;
mod pain;
mod solution;

pub use agent::{AgentGeneration, AgentSpec};
pub use chat::{ChatMessage, ChatMode, ChatRequest, ChatRole};
pub use deployment::{DeploymentPlan, ServiceDeployment};
pub use manifest::{
    AgentManifest, ContainerPort, EnvVar, ManifestBundle, ManifestMetadata, ResourceAmounts,
    ResourceRequirements, ServiceManifest, ServiceSpec,
};
pub use pain::{Pain, PainAnalysis, ProblemStructure, Severity};
pub use solution::{DesignStructure, Solution, SolutionDesign};
