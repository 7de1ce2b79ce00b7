//! Test utilities for Storyarc narrative tests.
//!
//! This module provides a scripted driver that records every prompt it receives.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyarc_core::{GenerateRequest, GenerateResponse};
use storyarc_error::{ServiceError, ServiceErrorKind, StoryResult};
use storyarc_interface::StoryDriver;

/// A single scripted response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(ServiceErrorKind),
}

/// Driver that replays a fixed sequence of responses.
///
/// Once the sequence is exhausted the fallback text is returned, or a
/// `ServiceError` when there is none. Clones share the same script and log.
#[derive(Clone)]
pub struct MockDriver {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    fallback: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockDriver {
    /// Replay `responses` in order.
    pub fn sequence(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            fallback: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replay text responses in order.
    pub fn texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::sequence(texts.into_iter().map(|t| MockResponse::Text(t.into())).collect())
    }

    /// Always answer with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::sequence(Vec::new()).with_fallback(text)
    }

    /// Always fail.
    pub fn failing() -> Self {
        Self::sequence(Vec::new())
    }

    /// Answer with `text` once the scripted responses run out.
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(text.into());
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Append responses to the script.
    pub fn push(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of generate() calls.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Highest number of generate() calls that were running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// The most recent prompt.
    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl StoryDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> StoryResult<GenerateResponse> {
        let prompt = req
            .messages()
            .iter()
            .map(|m| m.content().as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(MockResponse::Text(text)) => Ok(GenerateResponse::from_text(text)),
            Some(MockResponse::Error(kind)) => Err(ServiceError::new(kind).into()),
            None => match &self.fallback {
                Some(text) => Ok(GenerateResponse::from_text(text.clone())),
                None => Err(ServiceError::new(ServiceErrorKind::Http(
                    "mock script exhausted".to_string(),
                ))
                .into()),
            },
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model-v1"
    }
}

/// Text with exactly `n` Hangul syllables, broken by spaces and punctuation.
pub fn hangul(n: usize) -> String {
    let mut text = String::new();
    for i in 0..n {
        text.push('가');
        if i % 10 == 9 {
            text.push_str(". ");
        }
    }
    text
}

/// A transport error kind for scripting failures.
pub fn outage() -> MockResponse {
    MockResponse::Error(ServiceErrorKind::Api {
        status: 503,
        message: "Service unavailable".to_string(),
    })
}
