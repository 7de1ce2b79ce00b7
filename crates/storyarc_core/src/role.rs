//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Speaker of a message sent to the model.
///
/// # Examples
///
/// ```
/// use storyarc_core::Role;
///
/// assert_eq!(Role::User.as_str(), "user");
/// assert_eq!(format!("{}", Role::Assistant), "Assistant");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User messages carry the prompt
    User,
    /// Assistant messages are from the model
    Assistant,
}

impl Role {
    /// Wire name used by the Anthropic message format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}
