//! Core data types for the Storyarc story generation pipeline.
//!
//! This crate provides the value types shared across all Storyarc crates:
//! the four act labels, per-act target counts, the character metric used to
//! measure generated prose, and the request/response types exchanged with a
//! language model driver.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod act;
mod metric;
mod request;
mod role;
mod targets;

pub use act::ActLabel;
pub use metric::{Adjustment, TargetWindow, TextMetric, HANGUL_SYLLABLES};
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateResponse, Message, MessageBuilder,
};
pub use role::Role;
pub use targets::{TargetCounts, TargetRange};
