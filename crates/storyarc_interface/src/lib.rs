//! Trait definitions for Storyarc language model drivers.
//!
//! A driver is the opaque text-completion capability the pipeline delegates
//! all generation to. Concrete transports live in `storyarc_models`; tests
//! supply scripted drivers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::StoryDriver;
