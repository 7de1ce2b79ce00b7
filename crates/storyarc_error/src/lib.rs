//! Error types for the Storyarc pipeline.
//!
//! This crate provides the error taxonomy shared by every Storyarc crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The three pipeline failure domains are:
//! - [`ValidationError`]: empty user input or out-of-range settings, reported before any work
//! - [`PrerequisiteError`]: a stage was requested before the stage it depends on
//! - [`ServiceError`]: the language model provider failed, after retries were exhausted
//!
//! # Examples
//!
//! ```
//! use storyarc_error::{StoryResult, ValidationError, ValidationErrorKind};
//!
//! fn submit(text: &str) -> StoryResult<()> {
//!     if text.trim().is_empty() {
//!         Err(ValidationError::new(ValidationErrorKind::EmptyInput {
//!             field: "script".to_string(),
//!         }))?
//!     }
//!     Ok(())
//! }
//!
//! let err = submit("   ").unwrap_err();
//! assert!(err.is_validation());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod prerequisite;
mod service;
mod validation;

pub use config::ConfigError;
pub use error::{StoryError, StoryErrorKind, StoryResult};
pub use prerequisite::{PrerequisiteError, PrerequisiteErrorKind};
pub use service::{ServiceError, ServiceErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
