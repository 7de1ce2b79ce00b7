//! The four narrative acts.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// One of the four acts of a story, in generation order.
///
/// The derived ordering follows the narrative: `Setup < Development < Twist < Resolution`.
///
/// # Examples
///
/// ```
/// use storyarc_core::ActLabel;
///
/// let before: Vec<_> = ActLabel::Twist.predecessors().collect();
/// assert_eq!(before, [ActLabel::Setup, ActLabel::Development]);
/// assert_eq!(ActLabel::Resolution.korean(), "결");
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
    EnumIter,
    derive_more::Display,
)]
pub enum ActLabel {
    /// 기: introduces characters, setting and the initial problem
    Setup,
    /// 승: escalates the conflict
    Development,
    /// 전: reversal or turning point
    Twist,
    /// 결: resolves conflicts and closes the theme
    Resolution,
}

impl ActLabel {
    /// All acts in generation order.
    pub fn all() -> impl Iterator<Item = ActLabel> {
        ActLabel::iter()
    }

    /// Every act that must exist before this one can be generated.
    pub fn predecessors(self) -> impl Iterator<Item = ActLabel> {
        ActLabel::iter().take_while(move |act| *act < self)
    }

    /// Single-syllable Korean name used in prompts and labels.
    pub fn korean(self) -> &'static str {
        match self {
            ActLabel::Setup => "기",
            ActLabel::Development => "승",
            ActLabel::Twist => "전",
            ActLabel::Resolution => "결",
        }
    }
}
