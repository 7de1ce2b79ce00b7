//! Request and response types for LLM generation.

use crate::Role;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A single text message in a conversation.
///
/// # Examples
///
/// ```
/// use storyarc_core::{Message, Role};
///
/// let message = Message::user("대본을 분석해주세요");
/// assert_eq!(*message.role(), Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Message {
    /// The role of the message sender
    role: Role,
    /// Text content of the message
    content: String,
}

impl Message {
    /// User message with the given text.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Generation request handed to a driver.
///
/// # Examples
///
/// ```
/// use storyarc_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::user("Hello")])
///     .max_tokens(4096u32)
///     .temperature(0.7f32)
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.max_tokens(), 4096);
/// assert!(request.model().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// The conversation messages to send
    messages: Vec<Message>,
    /// Maximum number of tokens to generate
    max_tokens: u32,
    /// Sampling temperature (0.0 to 1.0)
    temperature: f32,
    /// Model override; drivers fall back to their configured model
    #[builder(default)]
    model: Option<String>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// Text returned by a driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GenerateResponse {
    /// Text blocks in the order the model produced them
    text_blocks: Vec<String>,
    /// Provider stop reason, when reported
    stop_reason: Option<String>,
}

impl GenerateResponse {
    /// Response from text blocks and an optional stop reason.
    pub fn new(text_blocks: Vec<String>, stop_reason: Option<String>) -> Self {
        Self {
            text_blocks,
            stop_reason,
        }
    }

    /// Response holding one text block.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![text.into()], None)
    }

    /// All text blocks concatenated.
    pub fn text(&self) -> String {
        self.text_blocks.concat()
    }

    /// True when there is no non-whitespace text.
    pub fn is_empty(&self) -> bool {
        self.text_blocks.iter().all(|block| block.trim().is_empty())
    }
}
