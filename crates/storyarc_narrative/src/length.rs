//! Length-constrained generation.

use crate::{CompletionClient, prompts};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyarc_core::{TargetWindow, TextMetric};
use storyarc_error::StoryResult;
use storyarc_interface::StoryDriver;
use tracing::{debug, info, instrument, warn};

/// Content produced for a target window.
///
/// The window is advisory: once correction rounds run out the last content
/// is returned whether or not it fits, and [`Generated::within_window`]
/// reports which case applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Generated {
    /// Final content
    content: String,
    /// Measured count of `content`
    count: usize,
    /// Window the content was measured against
    window: TargetWindow,
    /// Correction rounds issued after the first completion
    corrections: usize,
}

impl Generated {
    /// True when `count` lies inside the window.
    pub fn within_window(&self) -> bool {
        self.window.contains(self.count)
    }

    /// Take the content.
    pub fn into_content(self) -> String {
        self.content
    }
}

/// Generates content and corrects its length toward a target window.
#[derive(Debug, Clone, Getters, Serialize, Deserialize, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct LengthConstrainedGenerator {
    /// Metric used to measure content
    #[serde(skip)]
    metric: TextMetric,
    /// Half-width of the acceptance window
    #[serde(default = "default_tolerance")]
    tolerance: usize,
    /// Correction rounds allowed after the first completion
    #[serde(default = "default_correction_rounds")]
    correction_rounds: usize,
}

fn default_tolerance() -> usize {
    200
}

fn default_correction_rounds() -> usize {
    2
}

impl Default for LengthConstrainedGenerator {
    fn default() -> Self {
        Self {
            metric: TextMetric::default(),
            tolerance: default_tolerance(),
            correction_rounds: default_correction_rounds(),
        }
    }
}

impl LengthConstrainedGenerator {
    /// Window around `target` using this generator's tolerance.
    pub fn window(&self, target: usize) -> TargetWindow {
        TargetWindow::new(target, self.tolerance)
    }

    /// Generate from `prompt`, then correct toward `target` at most `correction_rounds` times.
    ///
    /// # Errors
    ///
    /// Any completion failure aborts the whole generation; no partial content is returned.
    #[instrument(skip_all, fields(target_count = target, tolerance = self.tolerance))]
    pub async fn generate<D: StoryDriver>(
        &self,
        client: &CompletionClient<D>,
        prompt: &str,
        target: usize,
    ) -> StoryResult<Generated> {
        let window = self.window(target);
        let mut content = client.complete(prompt).await?;
        let mut count = self.metric.count(&content);
        debug!(count, lower = window.lower(), upper = window.upper(), "Measured first completion");

        let mut corrections = 0;
        while corrections < self.correction_rounds {
            let Some(adjustment) = window.adjustment(count) else {
                break;
            };
            corrections += 1;
            warn!(
                round = corrections,
                count,
                adjustment = %adjustment,
                "Content outside target window, requesting correction"
            );

            let correction = prompts::correction(adjustment, count, window, &content);
            content = client.complete(&correction).await?;
            count = self.metric.count(&content);
        }

        let generated = Generated {
            content,
            count,
            window,
            corrections,
        };
        if generated.within_window() {
            info!(count, corrections, "Content accepted");
        } else {
            warn!(count, corrections, "Correction rounds exhausted, returning last attempt");
        }
        Ok(generated)
    }
}
