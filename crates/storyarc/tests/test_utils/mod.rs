//! Scripted driver for Storyarc integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use storyarc::{GenerateRequest, GenerateResponse, ServiceError, ServiceErrorKind, StoryDriver, StoryResult};

/// Driver that answers from a queue, failing once it is empty.
#[derive(Clone, Default)]
pub struct ScriptedDriver {
    replies: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedDriver {
    /// Answer with `replies` in order.
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().map(Into::into).collect())),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue another reply.
    pub fn push(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(reply.into());
    }

    /// Number of generate() calls.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl StoryDriver for ScriptedDriver {
    async fn generate(&self, _req: &GenerateRequest) -> StoryResult<GenerateResponse> {
        *self.calls.lock().unwrap() += 1;
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(text) => Ok(GenerateResponse::from_text(text)),
            None => Err(ServiceError::new(ServiceErrorKind::Api {
                status: 500,
                message: "script exhausted".to_string(),
            })
            .into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Text with exactly `n` Hangul syllables.
pub fn hangul(n: usize) -> String {
    "이야기".chars().cycle().take(n).collect()
}
