//! Manifest generation output: one container service manifest per agent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name and labels of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestMetadata {
    /// Service name.
    pub name: String,
    /// Free-form labels.
    pub labels: BTreeMap<String, String>,
}

/// A port the container listens on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerPort {
    /// Port number inside the container.
    pub container_port: u16,
    /// Usually `TCP`.
    pub protocol: String,
}

/// One environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvVar {
    /// Variable name.
    pub name: String,
    /// Variable value.
    pub value: String,
}

/// Memory and CPU quantities, e.g. `256Mi` and `250m`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceAmounts {
    /// Memory quantity.
    pub memory: String,
    /// CPU quantity.
    pub cpu: String,
}

/// Requested and maximum resources.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRequirements {
    /// Guaranteed resources.
    pub requests: ResourceAmounts,
    /// Upper bounds.
    pub limits: ResourceAmounts,
}

/// Container settings of a service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceSpec {
    /// Container image reference, also used for the build/push commands.
    pub image: String,
    /// Exposed ports.
    pub ports: Vec<ContainerPort>,
    /// Environment passed to the container.
    pub env: Vec<EnvVar>,
    /// Resource requests and limits.
    pub resources: ResourceRequirements,
}

/// A Kubernetes-style service manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceManifest {
    /// e.g. `serving.knative.dev/v1`.
    pub api_version: String,
    /// e.g. `Service`.
    pub kind: String,
    /// Name and labels.
    pub metadata: ManifestMetadata,
    /// Container settings.
    pub spec: ServiceSpec,
}

/// The manifest generated for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentManifest {
    /// Agent name.
    pub name: String,
    /// Its service manifest.
    pub manifest: ServiceManifest,
}

/// Result of the `manifest-generation` stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestBundle {
    /// One entry per generated agent.
    pub agents: Vec<AgentManifest>,
}

impl ManifestBundle {
    /// Returns true if at least one agent manifest was produced.
    #[must_use]
    pub fn has_manifests(&self) -> bool {
        !self.agents.is_empty()
    }
}
