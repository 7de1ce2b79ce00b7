//! Anthropic Messages API client.

use crate::messages::{MessagesRequest, dispatch};
use reqwest::Client;
use storyarc_core::{GenerateRequest, GenerateResponse};
use storyarc_error::StoryResult;
use storyarc_interface::StoryDriver;
use tracing::{debug, instrument};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl AnthropicClient {
    /// Creates a new Anthropic client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `model` - Model identifier (e.g., "claude-3-5-sonnet-20241022")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        debug!("Creating new Anthropic client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            endpoint: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Send requests to a different messages endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait::async_trait]
impl StoryDriver for AnthropicClient {
    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate(&self, request: &GenerateRequest) -> StoryResult<GenerateResponse> {
        let model = request.model().clone().unwrap_or_else(|| self.model.clone());
        let body = MessagesRequest::from_generate(request, Some(model), None)?;

        debug!("Sending request to Anthropic API");
        let http = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body);

        let response = dispatch(http, self.provider_name()).await?;
        debug!(response_id = ?response.id(), "Received response from Anthropic");
        Ok(response.into_generate_response()?)
    }
}
