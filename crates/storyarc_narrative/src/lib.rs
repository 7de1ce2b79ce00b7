//! Four-act story pipeline for Storyarc.
//!
//! This crate turns a script into a four-act story (기승전결) by sequencing
//! calls to a language model:
//!
//! 1. **Analysis**: the script is broken down into characters, structure and themes
//! 2. **Revision**: user feedback on the analysis produces a revised story proposal
//! 3. **Acts**: Setup, Development, Twist and Resolution are generated in order,
//!    each measured against a target character count and corrected when it misses
//!
//! # Example
//!
//! ```rust,ignore
//! use storyarc_narrative::{CompletionClient, StoryController};
//! use storyarc_models::BedrockClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = BedrockClient::new("key", "ap-northeast-2", "model-id");
//! let controller = StoryController::new(CompletionClient::new(driver));
//!
//! controller.analyze_script("한 영웅이 마을에 들어선다.").await?;
//! controller.process_feedback("주인공을 더 용감하게 바꿔주세요").await?;
//! let intro = controller.create_intro().await?;
//! println!("{} ({})", intro.content(), intro.count_label());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod controller;
mod length;
pub mod prompts;
mod session;

pub use client::{CompletionClient, GenerationParams, RetryPolicy};
pub use controller::{ActOutcome, StoryController};
pub use length::{Generated, LengthConstrainedGenerator};
pub use session::{NarrativeSession, SessionSnapshot, Stage};
