//! Per-act target character counts.

use crate::ActLabel;
use serde::{Deserialize, Serialize};
use storyarc_error::{ValidationError, ValidationErrorKind};

/// Inclusive range a target count must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRange {
    /// Smallest accepted target
    pub min: usize,
    /// Largest accepted target
    pub max: usize,
}

impl TargetRange {
    /// Check one value, naming the act in the error.
    #[track_caller]
    pub fn check(&self, act: ActLabel, value: usize) -> Result<usize, ValidationError> {
        if (self.min..=self.max).contains(&value) {
            Ok(value)
        } else {
            Err(ValidationError::new(ValidationErrorKind::TargetOutOfRange {
                act: act.to_string(),
                value,
                min: self.min,
                max: self.max,
            }))
        }
    }
}

impl Default for TargetRange {
    fn default() -> Self {
        Self { min: 500, max: 3500 }
    }
}

/// Target character count for each act.
///
/// # Examples
///
/// ```
/// use storyarc_core::{ActLabel, TargetCounts, TargetRange};
///
/// let counts = TargetCounts::validated([1000, 1500, 2000, 2500], &TargetRange::default()).unwrap();
/// assert_eq!(counts.get(ActLabel::Twist), 2000);
/// assert_eq!(counts.total(), 7000);
///
/// assert!(TargetCounts::validated([499, 1000, 1000, 1000], &TargetRange::default()).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCounts {
    /// Setup target
    pub setup: usize,
    /// Development target
    pub development: usize,
    /// Twist target
    pub twist: usize,
    /// Resolution target
    pub resolution: usize,
}

impl TargetCounts {
    /// Same target for every act.
    pub fn uniform(target: usize) -> Self {
        Self {
            setup: target,
            development: target,
            twist: target,
            resolution: target,
        }
    }

    /// Build from values in act order, rejecting the set if any value is out of range.
    #[track_caller]
    pub fn validated(values: [usize; 4], range: &TargetRange) -> Result<Self, ValidationError> {
        let [setup, development, twist, resolution] = values;
        Ok(Self {
            setup: range.check(ActLabel::Setup, setup)?,
            development: range.check(ActLabel::Development, development)?,
            twist: range.check(ActLabel::Twist, twist)?,
            resolution: range.check(ActLabel::Resolution, resolution)?,
        })
    }

    /// Target for one act.
    pub fn get(&self, act: ActLabel) -> usize {
        match act {
            ActLabel::Setup => self.setup,
            ActLabel::Development => self.development,
            ActLabel::Twist => self.twist,
            ActLabel::Resolution => self.resolution,
        }
    }

    /// Sum over all acts.
    pub fn total(&self) -> usize {
        ActLabel::all().map(|act| self.get(act)).sum()
    }
}

impl Default for TargetCounts {
    fn default() -> Self {
        Self::uniform(2500)
    }
}
