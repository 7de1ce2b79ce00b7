//! Named story actions over a locked session.

use crate::{CompletionClient, Generated, LengthConstrainedGenerator, NarrativeSession, SessionSnapshot};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyarc_core::ActLabel;
use storyarc_error::StoryResult;
use storyarc_interface::StoryDriver;
use tokio::sync::Mutex;
use tracing::{info, instrument};

/// Result of an act action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ActOutcome {
    /// Which act was generated
    act: ActLabel,
    /// Generated content
    content: String,
    /// Measured character count
    count: usize,
    /// Target the act was generated for
    target: usize,
    /// Whether the count landed inside the target window
    within_window: bool,
    /// Correction rounds that were needed
    corrections: usize,
}

impl ActOutcome {
    fn new(act: ActLabel, generated: Generated) -> Self {
        let within_window = generated.within_window();
        let count = *generated.count();
        let target = generated.window().target();
        let corrections = *generated.corrections();
        Self {
            act,
            content: generated.into_content(),
            count,
            target,
            within_window,
            corrections,
        }
    }

    /// Count label such as `2431자`.
    pub fn count_label(&self) -> String {
        format!("{}자", self.count)
    }
}

/// Owns one session and serializes every operation on it.
///
/// Each action holds the session lock until it completes, including all of
/// its model calls, so no two actions ever interleave on the same session.
pub struct StoryController<D: StoryDriver> {
    client: CompletionClient<D>,
    generator: LengthConstrainedGenerator,
    session: Mutex<NarrativeSession>,
}

impl<D: StoryDriver> StoryController<D> {
    /// Controller with a fresh session and the default generator.
    pub fn new(client: CompletionClient<D>) -> Self {
        Self::with_session(client, LengthConstrainedGenerator::default(), NarrativeSession::new())
    }

    /// Controller over an existing session.
    pub fn with_session(
        client: CompletionClient<D>,
        generator: LengthConstrainedGenerator,
        session: NarrativeSession,
    ) -> Self {
        Self {
            client,
            generator,
            session: Mutex::new(session),
        }
    }

    /// The completion client.
    pub fn client(&self) -> &CompletionClient<D> {
        &self.client
    }

    /// The length-constrained generator.
    pub fn generator(&self) -> &LengthConstrainedGenerator {
        &self.generator
    }

    /// Analyze a script; returns the analysis.
    #[instrument(skip_all)]
    pub async fn analyze_script(&self, script: &str) -> StoryResult<String> {
        let mut session = self.session.lock().await;
        session.submit_input(&self.client, script).await
    }

    /// Revise the story from feedback; returns the revision.
    #[instrument(skip_all)]
    pub async fn process_feedback(&self, feedback: &str) -> StoryResult<String> {
        let mut session = self.session.lock().await;
        session.submit_feedback(&self.client, feedback).await
    }

    /// Generate one act.
    #[instrument(skip(self), fields(act = %label))]
    pub async fn create_act(&self, label: ActLabel) -> StoryResult<ActOutcome> {
        let mut session = self.session.lock().await;
        info!("'{}' 파트 생성 중", label.korean());
        let generated = session
            .generate_act(&self.client, &self.generator, label)
            .await?;
        Ok(ActOutcome::new(label, generated))
    }

    /// Generate the Setup act.
    pub async fn create_intro(&self) -> StoryResult<ActOutcome> {
        self.create_act(ActLabel::Setup).await
    }

    /// Generate the Development act.
    pub async fn create_development(&self) -> StoryResult<ActOutcome> {
        self.create_act(ActLabel::Development).await
    }

    /// Generate the Twist act.
    pub async fn create_turn(&self) -> StoryResult<ActOutcome> {
        self.create_act(ActLabel::Twist).await
    }

    /// Generate the Resolution act.
    pub async fn create_conclusion(&self) -> StoryResult<ActOutcome> {
        self.create_act(ActLabel::Resolution).await
    }

    /// Set all four targets; returns the total as a display line.
    pub async fn update_word_count(
        &self,
        setup: usize,
        development: usize,
        twist: usize,
        resolution: usize,
    ) -> StoryResult<String> {
        let mut session = self.session.lock().await;
        let total = session.set_target_counts([setup, development, twist, resolution])?;
        Ok(format!("설정된 총 글자수: {}자", total))
    }

    /// Set the steering instruction; returns a confirmation line.
    pub async fn update_instruction(&self, instruction: &str) -> String {
        let mut session = self.session.lock().await;
        let length = session.set_steering_instruction(instruction);
        format!("지시사항이 업데이트되었습니다: {}자", length)
    }

    /// Reset the session, keeping input, targets and instruction.
    pub async fn reset(&self) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        session.reset();
        session.snapshot()
    }

    /// Current session state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }
}
