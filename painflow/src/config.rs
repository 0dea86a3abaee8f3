//! Configuration types.
//!
//! Every section deserialises from JSON with per-field defaults, so a config
//! file only needs the keys it changes.

use crate::errors::PainflowError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PainflowConfig {
    /// Pipeline engine settings.
    pub workflow: WorkflowConfig,
    /// Live delta store settings.
    pub live: LiveStoreConfig,
    /// HTTP collaborator settings.
    pub http: HttpConfig,
    /// Local deployment preparation settings.
    pub deployment: DeploymentSettings,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl PainflowConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, PainflowError> {
        serde_json::from_str(json).map_err(|e| PainflowError::Config(e.to_string()))
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PainflowError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
            .map_err(|e| PainflowError::Config(format!("{}: {e}", path.display())))
    }
}

/// Configuration for the stage pipeline engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Name reported in events and logs.
    #[serde(default = "default_pipeline_name")]
    pub pipeline_name: String,
    /// Pause between marking a stage running and calling its collaborator.
    #[serde(default)]
    pub stage_delay_ms: u64,
}

fn default_pipeline_name() -> String {
    "pain-to-agent".to_string()
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            pipeline_name: default_pipeline_name(),
            stage_delay_ms: 0,
        }
    }
}

impl WorkflowConfig {
    /// Creates a new workflow configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pipeline name.
    #[must_use]
    pub fn with_pipeline_name(mut self, name: impl Into<String>) -> Self {
        self.pipeline_name = name.into();
        self
    }

    /// Sets the per-stage delay.
    #[must_use]
    pub fn with_stage_delay_ms(mut self, delay_ms: u64) -> Self {
        self.stage_delay_ms = delay_ms;
        self
    }

    /// The per-stage delay as a duration, `None` when disabled.
    #[must_use]
    pub fn stage_delay(&self) -> Option<Duration> {
        (self.stage_delay_ms > 0).then(|| Duration::from_millis(self.stage_delay_ms))
    }
}

/// Configuration for the live delta store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveStoreConfig {
    /// Coalescing interval used by the timer scheduler. 16 ms is one frame at 60 Hz.
    #[serde(default = "default_flush_interval")]
    pub flush_interval_ms: u64,
}

fn default_flush_interval() -> u64 {
    16
}

impl Default for LiveStoreConfig {
    fn default() -> Self {
        Self {
            flush_interval_ms: default_flush_interval(),
        }
    }
}

impl LiveStoreConfig {
    /// Sets the flush interval.
    #[must_use]
    pub fn with_flush_interval_ms(mut self, interval_ms: u64) -> Self {
        self.flush_interval_ms = interval_ms;
        self
    }

    /// The flush interval as a duration, never shorter than 1 ms.
    #[must_use]
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms.max(1))
    }
}

/// Configuration for the HTTP collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL hosting `/api/workflow/*` and `/api/chat`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds. Generation calls are slow.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Additional headers sent with every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> f64 {
    120.0
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            headers: HashMap::new(),
        }
    }
}

impl HttpConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Timeout as a duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds.max(0.0))
    }

    /// Joins `path` onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Target for locally prepared deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSettings {
    /// Cloud project, `ai-agent-platform` by default.
    #[serde(default = "default_project_id")]
    pub project_id: String,
    /// Cloud region, `asia-northeast1` by default.
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_project_id() -> String {
    "ai-agent-platform".to_string()
}

fn default_region() -> String {
    "asia-northeast1".to_string()
}

impl Default for DeploymentSettings {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            region: default_region(),
        }
    }
}

impl DeploymentSettings {
    /// Sets the project id.
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    /// Sets the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "painflow=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PainflowConfig::default();
        assert_eq!(config.workflow.pipeline_name, "pain-to-agent");
        assert_eq!(config.workflow.stage_delay(), None);
        assert_eq!(config.live.flush_interval(), Duration::from_millis(16));
        assert_eq!(config.http.base_url, "http://localhost:3000");
        assert_eq!(config.deployment.region, "asia-northeast1");
        assert_eq!(config.logging.filter, "painflow=info");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PainflowConfig::from_json_str(
            r#"{"workflow": {"stage_delay_ms": 1500}, "http": {"base_url": "https://example.test/"}}"#,
        )
        .unwrap();

        assert_eq!(config.workflow.stage_delay(), Some(Duration::from_millis(1500)));
        assert_eq!(config.workflow.pipeline_name, "pain-to-agent");
        assert_eq!(config.http.timeout_seconds, 120.0);
        assert_eq!(
            config.http.endpoint("/api/workflow/pain-analysis"),
            "https://example.test/api/workflow/pain-analysis"
        );
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = PainflowConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, PainflowError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"live": {{"flush_interval_ms": 0}}, "logging": {{"json": true}}}}"#).unwrap();

        let config = PainflowConfig::from_file(file.path()).unwrap();
        assert_eq!(config.live.flush_interval(), Duration::from_millis(1));
        assert!(config.logging.json);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PainflowConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PainflowError::Io(_)));
    }

    #[test]
    fn test_builders() {
        let http = HttpConfig::default()
            .with_base_url("http://svc")
            .with_timeout(5.0)
            .with_header("Authorization", "Bearer x");
        assert_eq!(http.timeout(), Duration::from_secs(5));
        assert_eq!(http.headers.len(), 1);

        let workflow = WorkflowConfig::new().with_pipeline_name("demo").with_stage_delay_ms(10);
        assert_eq!(workflow.pipeline_name, "demo");
        assert_eq!(workflow.stage_delay(), Some(Duration::from_millis(10)));
    }
}
