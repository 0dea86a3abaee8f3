//! Canned collaborator outputs for pipeline tests.
//!
//! The fixtures describe one small hiring scenario end to end, so a run fed
//! only with them completes every stage.

use crate::models::{
    AgentGeneration, AgentManifest, AgentSpec, ContainerPort, DesignStructure, EnvVar,
    ManifestBundle, ManifestMetadata, Pain, PainAnalysis, ProblemStructure, ResourceAmounts,
    ResourceRequirements, ServiceManifest, ServiceSpec, Severity, Solution, SolutionDesign,
};
use std::collections::BTreeMap;

/// Problem statement matching the fixtures below.
pub const SAMPLE_INPUT: &str =
    "Our recruiters spend hours screening resumes and still miss strong candidates.";

/// Two pains, one of them high severity.
#[must_use]
pub fn sample_pain_analysis() -> PainAnalysis {
    PainAnalysis {
        pains: vec![
            Pain {
                id: "P-001".to_string(),
                title: "Manual resume screening".to_string(),
                description: "Recruiters read every resume by hand".to_string(),
                severity: Severity::High,
                category: "efficiency".to_string(),
                impact: "Hours lost per opening".to_string(),
                frequency: "daily".to_string(),
                background: "Applicant volume doubled this year".to_string(),
                root_cause: "No automated pre-screening".to_string(),
            },
            Pain {
                id: "P-002".to_string(),
                title: "Inconsistent evaluation".to_string(),
                description: "Each recruiter weighs skills differently".to_string(),
                severity: Severity::Medium,
                category: "quality".to_string(),
                impact: "Strong candidates rejected".to_string(),
                frequency: "weekly".to_string(),
                background: "Rubrics live in individual notes".to_string(),
                root_cause: "No shared scoring rubric".to_string(),
            },
        ],
        structural_analysis: ProblemStructure {
            problem_domain: "Hiring".to_string(),
            stakeholders: vec!["recruiters".to_string(), "hiring managers".to_string()],
            constraints: vec!["existing ATS".to_string()],
            dependencies: vec!["resume parsing".to_string()],
        },
    }
}

/// One solution addressing both sample pains.
#[must_use]
pub fn sample_solution_design() -> SolutionDesign {
    SolutionDesign {
        solutions: vec![Solution {
            id: "S-001".to_string(),
            title: "Automated screening assistant".to_string(),
            description: "Scores resumes against a shared rubric".to_string(),
            pain_ids: vec!["P-001".to_string(), "P-002".to_string()],
            approach: "LLM scoring with recruiter review".to_string(),
            background: "Rubric agreed with hiring managers".to_string(),
            architecture: "Stateless HTTP service".to_string(),
            feasibility: "high".to_string(),
        }],
        structural_analysis: DesignStructure {
            design_principles: vec!["human in the loop".to_string()],
            technical_approach: "Containerised agent".to_string(),
            risk_assessment: vec!["scoring bias".to_string()],
            success_metrics: vec!["screening time halved".to_string()],
        },
    }
}

/// A single `screening-agent`.
#[must_use]
pub fn sample_agent_generation() -> AgentGeneration {
    AgentGeneration {
        agents: vec![AgentSpec {
            id: "A-001".to_string(),
            name: "screening-agent".to_string(),
            description: "Pre-screens resumes".to_string(),
            capabilities: vec!["resume-parsing".to_string(), "rubric-scoring".to_string()],
            solution_ids: vec!["S-001".to_string()],
        }],
    }
}

/// One service manifest for `screening-agent`.
#[must_use]
pub fn sample_manifest_bundle() -> ManifestBundle {
    let mut labels = BTreeMap::new();
    labels.insert("app".to_string(), "screening-agent".to_string());

    ManifestBundle {
        agents: vec![AgentManifest {
            name: "screening-agent".to_string(),
            manifest: ServiceManifest {
                api_version: "serving.knative.dev/v1".to_string(),
                kind: "Service".to_string(),
                metadata: ManifestMetadata {
                    name: "screening-agent".to_string(),
                    labels,
                },
                spec: ServiceSpec {
                    image: "gcr.io/ai-agent-platform/screening-agent:latest".to_string(),
                    ports: vec![ContainerPort {
                        container_port: 8080,
                        protocol: "TCP".to_string(),
                    }],
                    env: vec![EnvVar {
                        name: "MODE".to_string(),
                        value: "production".to_string(),
                    }],
                    resources: ResourceRequirements {
                        requests: ResourceAmounts {
                            memory: "256Mi".to_string(),
                            cpu: "250m".to_string(),
                        },
                        limits: ResourceAmounts {
                            memory: "512Mi".to_string(),
                            cpu: "500m".to_string(),
                        },
                    },
                },
            },
        }],
    }
}

/// A pain analysis that found nothing.
#[must_use]
pub fn empty_pain_analysis() -> PainAnalysis {
    PainAnalysis::default()
}

/// An agent generation that produced no agents.
#[must_use]
pub fn empty_agent_generation() -> AgentGeneration {
    AgentGeneration::default()
}
