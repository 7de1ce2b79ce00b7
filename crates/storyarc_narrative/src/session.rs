//! Pipeline state for one story.

use crate::{CompletionClient, Generated, LengthConstrainedGenerator, prompts};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use storyarc_core::{ActLabel, TargetCounts, TargetRange};
use storyarc_error::{PrerequisiteError, PrerequisiteErrorKind, StoryResult, ValidationError};
use storyarc_interface::StoryDriver;
use tracing::{debug, info, instrument};

/// Pipeline stage.
///
/// Analysis and feedback move the stage forward. A new script returns it to
/// [`Stage::AwaitingFeedback`] and [`NarrativeSession::reset`] to
/// [`Stage::AwaitingInput`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Stage {
    /// No analyzed script yet
    AwaitingInput,
    /// Analysis done, waiting for feedback
    AwaitingFeedback,
    /// Revision done, acts can be generated
    GeneratingActs,
}

/// State of one story as it moves through the pipeline.
///
/// Every operation validates its input and prerequisites first and writes
/// state only after its model calls succeed, so a failed operation leaves
/// the session untouched.
#[derive(Debug, Clone, Getters)]
pub struct NarrativeSession {
    /// Script from the last successful analysis
    original_input: Option<String>,
    /// Analysis of `original_input`
    analysis: Option<String>,
    /// Revised story proposal
    revision: Option<String>,
    #[getter(skip)]
    acts: BTreeMap<ActLabel, String>,
    /// Target character count per act
    target_counts: TargetCounts,
    /// Accepted range for target counts
    target_range: TargetRange,
    /// Free-text guidance added to every act prompt
    steering_instruction: String,
    /// Current stage
    stage: Stage,
}

impl Default for NarrativeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl NarrativeSession {
    /// Empty session with default targets.
    pub fn new() -> Self {
        Self {
            original_input: None,
            analysis: None,
            revision: None,
            acts: ActLabel::all().map(|act| (act, String::new())).collect(),
            target_counts: TargetCounts::default(),
            target_range: TargetRange::default(),
            steering_instruction: String::new(),
            stage: Stage::AwaitingInput,
        }
    }

    /// Use a different accepted range for target counts.
    pub fn with_target_range(mut self, range: TargetRange) -> Self {
        self.target_range = range;
        self
    }

    /// Start from the given targets instead of the defaults.
    pub fn with_target_counts(mut self, counts: TargetCounts) -> Self {
        self.target_counts = counts;
        self
    }

    /// Content of an act, or `None` while it is empty.
    pub fn act(&self, label: ActLabel) -> Option<&str> {
        self.acts
            .get(&label)
            .map(String::as_str)
            .filter(|content| !content.is_empty())
    }

    /// Analyze a script.
    ///
    /// Accepted in any stage. On success the previous revision and acts are
    /// discarded and the stage becomes [`Stage::AwaitingFeedback`].
    ///
    /// # Errors
    ///
    /// - [`ValidationError`] when `script` is blank
    /// - a service error when the analysis call fails
    #[instrument(skip_all, fields(script_chars = script.chars().count()))]
    pub async fn submit_input<D: StoryDriver>(
        &mut self,
        client: &CompletionClient<D>,
        script: &str,
    ) -> StoryResult<String> {
        if script.trim().is_empty() {
            return Err(ValidationError::empty("script").into());
        }

        let analysis = client.complete(&prompts::analysis(script)).await?;

        self.clear_generated();
        self.original_input = Some(script.to_string());
        self.analysis = Some(analysis.clone());
        self.stage = Stage::AwaitingFeedback;
        info!(analysis_chars = analysis.chars().count(), "Script analyzed");
        Ok(analysis)
    }

    /// Produce a revised story proposal from the analysis and `feedback`.
    ///
    /// May be repeated; existing acts are kept.
    ///
    /// # Errors
    ///
    /// - [`ValidationError`] when `feedback` is blank
    /// - [`PrerequisiteError`] when no analysis exists
    /// - a service error when the revision call fails
    #[instrument(skip_all, fields(feedback_chars = feedback.chars().count()))]
    pub async fn submit_feedback<D: StoryDriver>(
        &mut self,
        client: &CompletionClient<D>,
        feedback: &str,
    ) -> StoryResult<String> {
        if feedback.trim().is_empty() {
            return Err(ValidationError::empty("feedback").into());
        }
        let analysis = self
            .analysis
            .as_deref()
            .ok_or_else(|| PrerequisiteError::new(PrerequisiteErrorKind::MissingAnalysis))?;

        let prompt = prompts::revision(analysis, feedback);
        let revision = client.complete(&prompt).await?;

        self.revision = Some(revision.clone());
        self.stage = Stage::GeneratingActs;
        info!(revision_chars = revision.chars().count(), "Story revised");
        Ok(revision)
    }

    /// Check that `label` may be generated now.
    ///
    /// Setup needs the analysis and the revision; every later act needs all
    /// acts before it to be non-empty.
    #[track_caller]
    pub fn check_prerequisites(&self, label: ActLabel) -> Result<(), PrerequisiteError> {
        if let Some(missing) = label.predecessors().find(|act| self.act(*act).is_none()) {
            return Err(PrerequisiteError::new(PrerequisiteErrorKind::MissingAct {
                requested: label.to_string(),
                missing: missing.to_string(),
            }));
        }
        if self.analysis.is_none() {
            return Err(PrerequisiteError::new(PrerequisiteErrorKind::MissingAnalysis));
        }
        if self.revision.is_none() {
            return Err(PrerequisiteError::new(PrerequisiteErrorKind::MissingRevision));
        }
        Ok(())
    }

    /// Prompt that would be sent for `label` given the current state.
    pub fn act_prompt(&self, label: ActLabel, generator: &LengthConstrainedGenerator) -> String {
        let context = prompts::ActContext {
            analysis: self.analysis.as_deref().unwrap_or_default(),
            revision: self.revision.as_deref().unwrap_or_default(),
            setup: self.act(ActLabel::Setup).unwrap_or_default(),
            development: self.act(ActLabel::Development).unwrap_or_default(),
            twist: self.act(ActLabel::Twist).unwrap_or_default(),
            steering: &self.steering_instruction,
        };
        let window = generator.window(self.target_counts.get(label));
        prompts::act(label, &context, window)
    }

    /// Generate (or regenerate) one act.
    ///
    /// Later acts are left as they are when an earlier act is regenerated.
    ///
    /// # Errors
    ///
    /// - [`PrerequisiteError`] when an earlier stage or act is missing
    /// - a service error when any completion call fails
    #[instrument(skip(self, client, generator), fields(act = %label))]
    pub async fn generate_act<D: StoryDriver>(
        &mut self,
        client: &CompletionClient<D>,
        generator: &LengthConstrainedGenerator,
        label: ActLabel,
    ) -> StoryResult<Generated> {
        self.check_prerequisites(label)?;

        let target = self.target_counts.get(label);
        let prompt = self.act_prompt(label, generator);
        debug!(target, prompt_chars = prompt.chars().count(), "Generating act");
        let generated = generator.generate(client, &prompt, target).await?;

        self.acts.insert(label, generated.content().clone());
        info!(count = generated.count(), within_window = generated.within_window(), "Act stored");
        Ok(generated)
    }

    /// Replace all four targets, in act order, and return their sum.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] when any value is outside the target range; nothing is stored.
    pub fn set_target_counts(&mut self, values: [usize; 4]) -> StoryResult<usize> {
        let counts = TargetCounts::validated(values, &self.target_range)?;
        self.target_counts = counts;
        debug!(total = counts.total(), "Target counts updated");
        Ok(counts.total())
    }

    /// Store the steering instruction verbatim and return its length in characters.
    pub fn set_steering_instruction(&mut self, instruction: &str) -> usize {
        self.steering_instruction = instruction.to_string();
        instruction.chars().count()
    }

    /// Return to [`Stage::AwaitingInput`].
    ///
    /// Clears the analysis, revision and acts. Keeps the original input,
    /// target counts and steering instruction.
    pub fn reset(&mut self) {
        self.analysis = None;
        self.clear_generated();
        self.stage = Stage::AwaitingInput;
        info!("Session reset");
    }

    /// Serializable view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            stage: self.stage,
            original_input: self.original_input.clone(),
            analysis: self.analysis.clone(),
            revision: self.revision.clone(),
            acts: self.acts.clone(),
            target_counts: self.target_counts,
            steering_instruction: self.steering_instruction.clone(),
        }
    }

    fn clear_generated(&mut self) {
        self.revision = None;
        for content in self.acts.values_mut() {
            content.clear();
        }
    }
}

/// Point-in-time copy of a session for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current stage
    pub stage: Stage,
    /// Script from the last successful analysis
    pub original_input: Option<String>,
    /// Analysis text
    pub analysis: Option<String>,
    /// Revised story proposal
    pub revision: Option<String>,
    /// Act contents; empty strings for acts not yet generated
    pub acts: BTreeMap<ActLabel, String>,
    /// Target counts
    pub target_counts: TargetCounts,
    /// Steering instruction
    pub steering_instruction: String,
}
