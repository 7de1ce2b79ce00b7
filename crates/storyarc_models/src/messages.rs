//! Anthropic messages wire format, shared by both providers.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyarc_core::{GenerateRequest, GenerateResponse};
use storyarc_error::{ServiceError, ServiceErrorKind};
use tracing::{debug, error};

/// Messages API request body.
///
/// The direct API names the model in the body; Bedrock names it in the URL
/// and requires `anthropic_version` in the body instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), pattern = "owned")]
pub struct MessagesRequest {
    /// Model identifier
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    /// Bedrock protocol version
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    anthropic_version: Option<String>,
    /// Maximum tokens to generate
    max_tokens: u32,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Conversation messages
    messages: Vec<WireMessage>,
}

impl MessagesRequest {
    /// Creates a builder for `MessagesRequest`.
    pub fn builder() -> MessagesRequestBuilder {
        MessagesRequestBuilder::default()
    }

    /// Translate a generic request into the wire format.
    pub fn from_generate(
        request: &GenerateRequest,
        model: Option<String>,
        anthropic_version: Option<String>,
    ) -> Result<Self, ServiceError> {
        if request.messages().is_empty() {
            return Err(ServiceError::new(ServiceErrorKind::Builder(
                "Request must contain at least one message".to_string(),
            )));
        }

        let messages: Vec<WireMessage> = request
            .messages()
            .iter()
            .map(|message| WireMessage {
                role: message.role().as_str().to_string(),
                content: vec![ContentBlock::Text {
                    text: message.content().clone(),
                }],
            })
            .collect();

        Self::builder()
            .model(model)
            .anthropic_version(anthropic_version)
            .max_tokens(*request.max_tokens())
            .temperature(Some(*request.temperature()))
            .messages(messages)
            .build()
            .map_err(|e| ServiceError::new(ServiceErrorKind::Builder(e.to_string())))
    }
}

/// One message on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct WireMessage {
    /// "user" or "assistant"
    role: String,
    /// Content blocks
    content: Vec<ContentBlock>,
}

/// Content block in a request message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text content
    Text {
        /// Text content
        text: String,
    },
}

/// Messages API response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct MessagesResponse {
    /// Response ID
    #[serde(default)]
    id: Option<String>,
    /// Content blocks
    content: Vec<ResponseContent>,
    /// Stop reason
    #[serde(default)]
    stop_reason: Option<String>,
    /// Usage information
    #[serde(default)]
    usage: Option<Usage>,
}

impl MessagesResponse {
    /// Keep the text blocks, failing when there are none.
    pub fn into_generate_response(self) -> Result<GenerateResponse, ServiceError> {
        let text_blocks: Vec<String> = self
            .content
            .into_iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text)
            .collect();

        let response = GenerateResponse::new(text_blocks, self.stop_reason);
        if response.is_empty() {
            return Err(ServiceError::new(ServiceErrorKind::EmptyResponse));
        }
        Ok(response)
    }
}

/// Content in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ResponseContent {
    /// Block type ("text" for prose)
    #[serde(rename = "type")]
    content_type: String,
    /// Text, present on text blocks
    #[serde(default)]
    text: Option<String>,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Usage {
    /// Input tokens
    input_tokens: u32,
    /// Output tokens
    output_tokens: u32,
}

/// Send a prepared request and decode the reply.
pub(crate) async fn dispatch(
    request: reqwest::RequestBuilder,
    provider: &'static str,
) -> Result<MessagesResponse, ServiceError> {
    let response = request.send().await.map_err(|e| {
        error!(provider, error = ?e, "Failed to send request");
        ServiceError::new(ServiceErrorKind::Http(format!("Request failed: {}", e)))
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(provider, status = %status, body = %body, "Provider returned error");
        return Err(ServiceError::new(ServiceErrorKind::Api {
            status: status.as_u16(),
            message: body,
        }));
    }

    let parsed: MessagesResponse = response.json().await.map_err(|e| {
        error!(provider, error = ?e, "Failed to parse response");
        ServiceError::new(ServiceErrorKind::Parse(format!(
            "Failed to parse response: {}",
            e
        )))
    })?;

    if let Some(usage) = parsed.usage() {
        debug!(
            provider,
            input_tokens = usage.input_tokens(),
            output_tokens = usage.output_tokens(),
            "Received response"
        );
    }
    Ok(parsed)
}
