//! Storyarc - four-act Korean story generation
//!
//! Storyarc turns a script into a story in four acts (기승전결) with a language
//! model, keeping each act near a target length in Hangul syllables.
//!
//! # Features
//!
//! - **Pipeline**: analysis, revision from user feedback, then Setup, Development, Twist and Resolution
//! - **Length control**: each act is measured and corrected toward its target window
//! - **Providers**: Amazon Bedrock or the Anthropic Messages API
//! - **HTTP actions**: every stage exposed as `POST /api/<action>`
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use storyarc::StoryConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryConfig::load()?;
//!     let controller = config.build_controller()?;
//!
//!     controller.analyze_script("한 영웅이 마을에 들어선다.").await?;
//!     controller.process_feedback("주인공을 더 용감하게").await?;
//!     let intro = controller.create_intro().await?;
//!     println!("{}\n({})", intro.content(), intro.count_label());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - export tracing spans through OpenTelemetry (stdout)
//! - `api` - enable tests that call real providers
//!
//! # Architecture
//!
//! - `storyarc_error` - Error types
//! - `storyarc_core` - Acts, text metric, target windows, request types
//! - `storyarc_interface` - StoryDriver trait definition
//! - `storyarc_models` - Bedrock and Anthropic transports
//! - `storyarc_narrative` - Completion client, length control, session and controller
//!
//! This crate (`storyarc`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod logging;
pub mod server;

pub use config::{Credentials, ModelConfig, Provider, ServerConfig, StoryConfig, TargetsConfig};
pub use logging::{LoggingConfig, init_logging};

pub use storyarc_core::*;
pub use storyarc_error::*;
pub use storyarc_interface::*;
pub use storyarc_models::{AnthropicClient, BedrockClient};
pub use storyarc_narrative::*;
