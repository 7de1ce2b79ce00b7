//! Language model transports for Storyarc.
//!
//! Both providers speak the Anthropic messages format:
//!
//! - **Bedrock** ([`BedrockClient`]): Amazon Bedrock runtime `InvokeModel`, authenticated
//!   with a Bedrock API key (`Authorization: Bearer`)
//! - **Anthropic** ([`AnthropicClient`]): the Anthropic Messages API, authenticated with `x-api-key`
//!
//! # Example
//!
//! ```no_run
//! use storyarc_core::{GenerateRequest, Message};
//! use storyarc_interface::StoryDriver;
//! use storyarc_models::BedrockClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BedrockClient::new(
//!     "bedrock-api-key",
//!     "ap-northeast-2",
//!     "apac.anthropic.claude-3-5-sonnet-20241022-v2:0",
//! );
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user("안녕하세요")])
//!     .max_tokens(4096u32)
//!     .temperature(0.7f32)
//!     .build()?;
//! let response = client.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anthropic;
mod bedrock;
mod messages;

pub use anthropic::AnthropicClient;
pub use bedrock::BedrockClient;
pub use messages::{
    ContentBlock, MessagesRequest, MessagesRequestBuilder, MessagesResponse, ResponseContent,
    Usage, WireMessage,
};
