//! Amazon Bedrock runtime client for Anthropic models.

use crate::messages::{MessagesRequest, dispatch};
use reqwest::Client;
use storyarc_core::{GenerateRequest, GenerateResponse};
use storyarc_error::StoryResult;
use storyarc_interface::StoryDriver;
use tracing::{debug, instrument};

const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Bedrock `InvokeModel` client authenticated with a Bedrock API key.
#[derive(Debug, Clone)]
pub struct BedrockClient {
    client: Client,
    api_key: String,
    region: String,
    model_id: String,
    profile: Option<String>,
    endpoint: Option<String>,
}

impl BedrockClient {
    /// Creates a new Bedrock client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bedrock API key (`AWS_BEARER_TOKEN_BEDROCK`)
    /// * `region` - AWS region hosting the runtime endpoint
    /// * `model_id` - Model or inference profile ID
    pub fn new(
        api_key: impl Into<String>,
        region: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        debug!("Creating new Bedrock client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            region: region.into(),
            model_id: model_id.into(),
            profile: None,
            endpoint: None,
        }
    }

    /// Record the credential profile the key was issued under.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Use a base URL other than the regional runtime endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Region the client targets.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// URL of the `InvokeModel` operation for a model.
    pub fn invoke_url(&self, model_id: &str) -> String {
        let base = self
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", self.region));
        format!("{}/model/{}/invoke", base.trim_end_matches('/'), model_id)
    }
}

#[async_trait::async_trait]
impl StoryDriver for BedrockClient {
    fn provider_name(&self) -> &'static str {
        "bedrock"
    }

    fn model_name(&self) -> &str {
        &self.model_id
    }

    #[instrument(
        skip(self, request),
        fields(model = %self.model_id, region = %self.region, profile = ?self.profile)
    )]
    async fn generate(&self, request: &GenerateRequest) -> StoryResult<GenerateResponse> {
        let model_id = request.model().as_deref().unwrap_or(&self.model_id);
        let body = MessagesRequest::from_generate(
            request,
            None,
            Some(BEDROCK_ANTHROPIC_VERSION.to_string()),
        )?;

        let url = self.invoke_url(model_id);
        debug!(url = %url, "Invoking Bedrock model");
        let http = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .json(&body);

        let response = dispatch(http, self.provider_name()).await?;
        Ok(response.into_generate_response()?)
    }
}
