//! Character counting and target windows.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Precomposed Hangul syllables, U+AC00 (가) through U+D7A3 (힣).
pub const HANGUL_SYLLABLES: RangeInclusive<char> = '\u{AC00}'..='\u{D7A3}';

/// Counts the characters of a text that belong to a writing system's core alphabet.
///
/// Whitespace, punctuation, digits and characters from other scripts are
/// never counted.
///
/// # Examples
///
/// ```
/// use storyarc_core::TextMetric;
///
/// let metric = TextMetric::hangul();
/// assert_eq!(metric.count("안녕하세요, world! 123"), 5);
/// assert_eq!(metric.count(""), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMetric {
    alphabet: RangeInclusive<char>,
}

impl TextMetric {
    /// Metric over an arbitrary contiguous block of characters.
    pub fn new(alphabet: RangeInclusive<char>) -> Self {
        Self { alphabet }
    }

    /// Metric over precomposed Hangul syllables.
    pub fn hangul() -> Self {
        Self::new(HANGUL_SYLLABLES)
    }

    /// Number of characters of `text` inside the alphabet.
    pub fn count(&self, text: &str) -> usize {
        text.chars().filter(|c| self.alphabet.contains(c)).count()
    }
}

impl Default for TextMetric {
    fn default() -> Self {
        Self::hangul()
    }
}

/// Direction a correction round asks the model to move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Adjustment {
    /// Content is above the window
    Shorten,
    /// Content is below the window
    Lengthen,
}

impl Adjustment {
    /// Korean instruction phrase placed in the correction prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Adjustment::Shorten => "줄여서",
            Adjustment::Lengthen => "늘려서",
        }
    }
}

/// Acceptable count range `[target - tolerance, target + tolerance]`.
///
/// The lower bound saturates at zero.
///
/// # Examples
///
/// ```
/// use storyarc_core::{Adjustment, TargetWindow};
///
/// let window = TargetWindow::new(2500, 200);
/// assert_eq!((window.lower(), window.upper()), (2300, 2700));
/// assert!(window.contains(2300));
/// assert_eq!(window.adjustment(1900), Some(Adjustment::Lengthen));
/// assert_eq!(window.adjustment(2701), Some(Adjustment::Shorten));
/// assert_eq!(window.adjustment(2500), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetWindow {
    target: usize,
    tolerance: usize,
}

impl TargetWindow {
    /// Window centred on `target`.
    pub fn new(target: usize, tolerance: usize) -> Self {
        Self { target, tolerance }
    }

    /// Centre of the window.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Inclusive lower bound.
    pub fn lower(&self) -> usize {
        self.target.saturating_sub(self.tolerance)
    }

    /// Inclusive upper bound.
    pub fn upper(&self) -> usize {
        self.target.saturating_add(self.tolerance)
    }

    /// True when `count` lies inside the window.
    pub fn contains(&self, count: usize) -> bool {
        (self.lower()..=self.upper()).contains(&count)
    }

    /// Correction needed for `count`, or `None` when it is accepted.
    pub fn adjustment(&self, count: usize) -> Option<Adjustment> {
        if count > self.upper() {
            Some(Adjustment::Shorten)
        } else if count < self.lower() {
            Some(Adjustment::Lengthen)
        } else {
            None
        }
    }
}
