//! Completion client with bounded retry.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use storyarc_core::{GenerateRequest, Message};
use storyarc_error::{ServiceError, ServiceErrorKind, StoryError, StoryResult};
use storyarc_interface::StoryDriver;
use tokio_retry2::strategy::{ExponentialBackoff, FixedInterval, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, error, instrument, warn};

/// Fixed sampling parameters sent with every prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct GenerationParams {
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    temperature: f32,
    /// Maximum output tokens
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// How many times a prompt is attempted before the failure is surfaced.
///
/// Every failure is retried. With `backoff_ms` at zero, retries are
/// immediate; otherwise delays grow exponentially with jitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct RetryPolicy {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    max_attempts: usize,
    /// Initial retry delay in milliseconds
    #[serde(default)]
    backoff_ms: u64,
}

fn default_max_attempts() -> usize {
    3
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: 0,
        }
    }
}

impl RetryPolicy {
    fn strategy(&self) -> Box<dyn Iterator<Item = Duration> + Send> {
        let retries = self.max_attempts.saturating_sub(1);
        if self.backoff_ms == 0 {
            Box::new(FixedInterval::from_millis(0).take(retries))
        } else {
            Box::new(
                ExponentialBackoff::from_millis(self.backoff_ms)
                    .factor(2)
                    .max_delay(Duration::from_secs(60))
                    .map(jitter)
                    .take(retries),
            )
        }
    }
}

/// Sends single prompts to a driver and returns the generated text.
pub struct CompletionClient<D: StoryDriver> {
    driver: D,
    params: GenerationParams,
    retry: RetryPolicy,
}

impl<D: StoryDriver> CompletionClient<D> {
    /// Client with default parameters and retry policy.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            params: GenerationParams::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the sampling parameters.
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sampling parameters in use.
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Retry policy in use.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send `prompt` as a single user message.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceErrorKind::RetriesExhausted`] once every attempt has failed.
    #[instrument(
        skip(self, prompt),
        fields(provider = self.driver.provider_name(), model = self.driver.model_name(), prompt_chars = prompt.chars().count())
    )]
    pub async fn complete(&self, prompt: &str) -> StoryResult<String> {
        let request = GenerateRequest::builder()
            .messages(vec![Message::user(prompt)])
            .max_tokens(self.params.max_tokens)
            .temperature(self.params.temperature)
            .build()
            .map_err(|e| ServiceError::new(ServiceErrorKind::Builder(e.to_string())))?;

        let max_attempts = self.retry.max_attempts.max(1);
        let attempts = AtomicUsize::new(0);
        let driver = &self.driver;
        let request = &request;
        let counter = &attempts;

        let result = Retry::spawn(self.retry.strategy(), move || async move {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            match driver.generate(request).await {
                Ok(response) if !response.is_empty() => Ok(response.text()),
                Ok(_) => {
                    warn!(attempt, max_attempts, "Empty completion, will retry");
                    Err(RetryError::Transient {
                        err: StoryError::from(ServiceError::new(ServiceErrorKind::EmptyResponse)),
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "Completion failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
            }
        })
        .await;

        match result {
            Ok(text) => {
                debug!(
                    attempts = attempts.load(Ordering::SeqCst),
                    completion_chars = text.chars().count(),
                    "Completion received"
                );
                Ok(text)
            }
            Err(e) => {
                let attempts = attempts.load(Ordering::SeqCst);
                error!(attempts, error = %e, "Completion failed on every attempt");
                Err(ServiceError::new(ServiceErrorKind::RetriesExhausted {
                    attempts,
                    last_error: e.to_string(),
                })
                .into())
            }
        }
    }
}
