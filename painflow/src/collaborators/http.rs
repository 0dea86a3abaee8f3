//! HTTP collaborators: the hosted workflow endpoints and the chat stream.

use super::{
    AgentGenerationRequest, DeploymentPrepRequest, ManifestRequest, PainAnalysisRequest,
    SolutionDesignRequest, WorkflowGenerator,
};
use crate::config::HttpConfig;
use crate::core::StageId;
use crate::errors::{GenerationError, PainflowError};
use crate::models::{
    AgentGeneration, ChatRequest, DeploymentPlan, ManifestBundle, PainAnalysis, SolutionDesign,
};
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Generator backed by `POST {base_url}/api/workflow/{stage-id}` endpoints.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    config: HttpConfig,
}

impl HttpGenerator {
    /// Creates a generator from configuration.
    pub fn new(config: HttpConfig) -> Result<Self, PainflowError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| PainflowError::Config(format!("invalid header name {key}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| PainflowError::Config(format!("invalid header value for {key}: {e}")))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// URL of a stage's endpoint.
    #[must_use]
    pub fn stage_url(&self, stage: StageId) -> String {
        self.config.endpoint(&format!("api/workflow/{stage}"))
    }

    async fn post_stage<Req, Res>(&self, stage: StageId, body: &Req) -> Result<Res, GenerationError>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        let url = self.stage_url(stage);
        debug!(stage = %stage, url = %url, "Calling stage endpoint");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::new(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(stage = %stage, status = status.as_u16(), "Stage endpoint returned failure");
            return Err(GenerationError::new(stage.failure_message()).with_status(status.as_u16()));
        }

        response
            .json::<Res>()
            .await
            .map_err(|e| GenerationError::new(format!("{}: {e}", stage.failure_message())))
    }

    /// Opens a streamed chat turn and returns the raw response body.
    ///
    /// The body uses the line-delimited format understood by
    /// [`StreamDecoder`](crate::live::StreamDecoder); feed it to
    /// [`pump_stream`](crate::live::pump_stream).
    pub async fn stream_chat(
        &self,
        request: &ChatRequest,
    ) -> Result<impl Stream<Item = Result<Vec<u8>, PainflowError>>, PainflowError> {
        let url = self.config.endpoint("api/chat");
        debug!(url = %url, mode = %request.mode, "Opening chat stream");

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PainflowError::Stream(format!(
                "chat endpoint returned {}",
                status.as_u16()
            )));
        }

        Ok(response
            .bytes_stream()
            .map_ok(|chunk| chunk.to_vec())
            .map_err(PainflowError::from))
    }
}

#[async_trait]
impl WorkflowGenerator for HttpGenerator {
    async fn analyze_pains(&self, request: PainAnalysisRequest) -> Result<PainAnalysis, GenerationError> {
        self.post_stage(StageId::PainAnalysis, &request).await
    }

    async fn design_solutions(
        &self,
        request: SolutionDesignRequest,
    ) -> Result<SolutionDesign, GenerationError> {
        self.post_stage(StageId::SolutionDesign, &request).await
    }

    async fn generate_agents(
        &self,
        request: AgentGenerationRequest,
    ) -> Result<AgentGeneration, GenerationError> {
        self.post_stage(StageId::AgentGeneration, &request).await
    }

    async fn generate_manifests(&self, request: ManifestRequest) -> Result<ManifestBundle, GenerationError> {
        self.post_stage(StageId::ManifestGeneration, &request).await
    }

    async fn prepare_deployment(
        &self,
        request: DeploymentPrepRequest,
    ) -> Result<DeploymentPlan, GenerationError> {
        self.post_stage(StageId::DeploymentPrep, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_urls() {
        let generator =
            HttpGenerator::new(HttpConfig::default().with_base_url("http://api.local/")).unwrap();
        assert_eq!(
            generator.stage_url(StageId::ManifestGeneration),
            "http://api.local/api/workflow/manifest-generation"
        );
        assert_eq!(
            generator.stage_url(StageId::DeploymentPrep),
            "http://api.local/api/workflow/deployment-prep"
        );
    }

    #[test]
    fn test_invalid_header_is_config_error() {
        let config = HttpConfig::default().with_header("bad header", "x");
        let err = HttpGenerator::new(config).unwrap_err();
        assert!(matches!(err, PainflowError::Config(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_stage_failure() {
        let config = HttpConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(2.0);
        let generator = HttpGenerator::new(config).unwrap();

        let result = generator
            .analyze_pains(PainAnalysisRequest {
                user_input: "anything".to_string(),
            })
            .await;

        let err = result.unwrap_err();
        assert!(!err.message.is_empty());
        assert_eq!(err.status, None);
    }
}
