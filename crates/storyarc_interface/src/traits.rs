//! Trait definitions for LLM backends.

use async_trait::async_trait;
use std::sync::Arc;
use storyarc_core::{GenerateRequest, GenerateResponse};
use storyarc_error::StoryResult;

/// Core trait that all LLM backends must implement.
///
/// A single call sends one request and returns the model's text. Drivers do
/// not retry; retrying is the caller's decision.
#[async_trait]
pub trait StoryDriver: Send + Sync {
    /// Generate model output for a request.
    async fn generate(&self, req: &GenerateRequest) -> StoryResult<GenerateResponse>;

    /// Provider name (e.g., "bedrock", "anthropic").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "claude-3-5-sonnet-20241022").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<D: StoryDriver + ?Sized> StoryDriver for Arc<D> {
    async fn generate(&self, req: &GenerateRequest) -> StoryResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<D: StoryDriver + ?Sized> StoryDriver for Box<D> {
    async fn generate(&self, req: &GenerateRequest) -> StoryResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
