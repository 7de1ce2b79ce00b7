mod test_utils;

use storyarc_core::{ActLabel, TargetCounts, TargetRange};
use storyarc_error::{PrerequisiteErrorKind, StoryErrorKind, ValidationErrorKind};
use storyarc_narrative::{CompletionClient, LengthConstrainedGenerator, NarrativeSession, Stage};
use test_utils::{MockDriver, MockResponse, hangul, outage};

fn prerequisite_kind(err: &storyarc_error::StoryError) -> PrerequisiteErrorKind {
    match err.kind() {
        StoryErrorKind::Prerequisite(e) => e.kind.clone(),
        other => panic!("Expected prerequisite error, got {:?}", other),
    }
}

/// Session that has an analysis and a revision, with uniform 1000 targets.
async fn revised_session(driver: &MockDriver) -> NarrativeSession {
    let client = CompletionClient::new(driver.clone());
    let mut session = NarrativeSession::new().with_target_counts(TargetCounts::uniform(1000));
    driver.push(MockResponse::Text("ANALYSIS".to_string()));
    driver.push(MockResponse::Text("REVISION".to_string()));
    session.submit_input(&client, "대본").await.unwrap();
    session.submit_feedback(&client, "의견").await.unwrap();
    session
}

#[tokio::test]
async fn test_full_pipeline_moves_through_stages() {
    let driver = MockDriver::texts(["ANALYSIS", "REVISION"]);
    let client = CompletionClient::new(driver.clone());
    let generator = LengthConstrainedGenerator::default();
    let mut session = NarrativeSession::new().with_target_counts(TargetCounts::uniform(1000));
    assert_eq!(*session.stage(), Stage::AwaitingInput);

    let analysis = session.submit_input(&client, "한 영웅이 마을에 들어선다.").await.unwrap();
    assert_eq!(analysis, "ANALYSIS");
    assert_eq!(*session.stage(), Stage::AwaitingFeedback);
    assert!(driver.last_prompt().contains("한 영웅이 마을에 들어선다."));

    let revision = session.submit_feedback(&client, "더 용감하게").await.unwrap();
    assert_eq!(revision, "REVISION");
    assert_eq!(*session.stage(), Stage::GeneratingActs);
    assert!(driver.last_prompt().contains("ANALYSIS"));
    assert!(driver.last_prompt().contains("더 용감하게"));

    for act in ActLabel::all() {
        driver.push(MockResponse::Text(hangul(1000)));
        let generated = session.generate_act(&client, &generator, act).await.unwrap();
        assert_eq!(*generated.count(), 1000);
        assert_eq!(session.act(act), Some(hangul(1000).as_str()));
    }
    assert_eq!(driver.call_count(), 6);
}

#[tokio::test]
async fn test_feedback_before_analysis_is_refused_without_a_call() {
    let driver = MockDriver::always("unused");
    let client = CompletionClient::new(driver.clone());
    let mut session = NarrativeSession::new();

    let err = session.submit_feedback(&client, "의견").await.unwrap_err();

    assert_eq!(prerequisite_kind(&err), PrerequisiteErrorKind::MissingAnalysis);
    assert_eq!(driver.call_count(), 0);
    assert!(session.revision().is_none());
    assert_eq!(*session.stage(), Stage::AwaitingInput);
}

#[tokio::test]
async fn test_blank_input_on_fresh_session_stays_awaiting_input() {
    let driver = MockDriver::always("unused");
    let client = CompletionClient::new(driver.clone());
    let mut session = NarrativeSession::new();

    assert!(session.submit_input(&client, "  ").await.unwrap_err().is_validation());

    assert_eq!(*session.stage(), Stage::AwaitingInput);
    assert!(session.original_input().is_none());
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_blank_input_is_rejected_and_state_kept() {
    let driver = MockDriver::texts(["ANALYSIS"]);
    let client = CompletionClient::new(driver.clone());
    let mut session = NarrativeSession::new();
    session.submit_input(&client, "대본").await.unwrap();

    for blank in ["", "   ", "\n\t"] {
        let err = session.submit_input(&client, blank).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.status_label(), "입력 필요");
    }
    assert_eq!(driver.call_count(), 1);
    assert_eq!(session.analysis().as_deref(), Some("ANALYSIS"));

    let err = session.submit_feedback(&client, "  ").await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(driver.call_count(), 1);
}

#[tokio::test]
async fn test_out_of_order_acts_are_refused() {
    let driver = MockDriver::always(hangul(1000));
    let client = CompletionClient::new(driver.clone());
    let generator = LengthConstrainedGenerator::default();
    let mut session = revised_session(&driver).await;
    let calls = driver.call_count();

    let err = session
        .generate_act(&client, &generator, ActLabel::Twist)
        .await
        .unwrap_err();

    match prerequisite_kind(&err) {
        PrerequisiteErrorKind::MissingAct { requested, missing } => {
            assert_eq!(requested, ActLabel::Twist.to_string());
            assert_eq!(missing, ActLabel::Setup.to_string());
        }
        other => panic!("Expected MissingAct, got {:?}", other),
    }
    assert_eq!(err.status_label(), "대기 중");
    assert_eq!(driver.call_count(), calls);
    assert!(session.act(ActLabel::Twist).is_none());
}

fn missing_act(err: &storyarc_error::StoryError) -> (String, String) {
    match prerequisite_kind(err) {
        PrerequisiteErrorKind::MissingAct { requested, missing } => (requested, missing),
        other => panic!("Expected MissingAct, got {:?}", other),
    }
}

#[tokio::test]
async fn test_each_act_requires_the_one_before() {
    let driver = MockDriver::sequence(Vec::new());
    let client = CompletionClient::new(driver.clone());
    let generator = LengthConstrainedGenerator::default();
    let mut session = revised_session(&driver).await;

    let err = session
        .generate_act(&client, &generator, ActLabel::Development)
        .await
        .unwrap_err();
    assert_eq!(
        missing_act(&err),
        (ActLabel::Development.to_string(), ActLabel::Setup.to_string())
    );
    assert!(session.act(ActLabel::Development).is_none());

    driver.push(MockResponse::Text(hangul(1000)));
    session.generate_act(&client, &generator, ActLabel::Setup).await.unwrap();
    let calls = driver.call_count();

    let err = session
        .generate_act(&client, &generator, ActLabel::Twist)
        .await
        .unwrap_err();
    assert_eq!(
        missing_act(&err),
        (ActLabel::Twist.to_string(), ActLabel::Development.to_string())
    );
    assert!(session.act(ActLabel::Twist).is_none());
    assert_eq!(driver.call_count(), calls);

    driver.push(MockResponse::Text(hangul(1000)));
    session
        .generate_act(&client, &generator, ActLabel::Development)
        .await
        .unwrap();

    let err = session
        .generate_act(&client, &generator, ActLabel::Resolution)
        .await
        .unwrap_err();
    assert_eq!(
        missing_act(&err),
        (ActLabel::Resolution.to_string(), ActLabel::Twist.to_string())
    );
    assert!(session.act(ActLabel::Resolution).is_none());
    assert_eq!(driver.call_count(), calls + 1);
}

#[tokio::test]
async fn test_setup_requires_revision() {
    let driver = MockDriver::texts(["ANALYSIS"]);
    let client = CompletionClient::new(driver.clone());
    let generator = LengthConstrainedGenerator::default();
    let mut session = NarrativeSession::new();
    session.submit_input(&client, "대본").await.unwrap();

    let err = session
        .generate_act(&client, &generator, ActLabel::Setup)
        .await
        .unwrap_err();

    assert_eq!(prerequisite_kind(&err), PrerequisiteErrorKind::MissingRevision);
    assert_eq!(driver.call_count(), 1);
}

#[tokio::test]
async fn test_regenerating_setup_keeps_later_acts() {
    let driver = MockDriver::sequence(Vec::new());
    let client = CompletionClient::new(driver.clone());
    let generator = LengthConstrainedGenerator::default();
    let mut session = revised_session(&driver).await;

    driver.push(MockResponse::Text(hangul(1000)));
    driver.push(MockResponse::Text(format!("승{}", hangul(999))));
    session.generate_act(&client, &generator, ActLabel::Setup).await.unwrap();
    session
        .generate_act(&client, &generator, ActLabel::Development)
        .await
        .unwrap();
    let development = session.act(ActLabel::Development).map(str::to_string);

    driver.push(MockResponse::Text(format!("새{}", hangul(999))));
    session.generate_act(&client, &generator, ActLabel::Setup).await.unwrap();

    assert!(session.act(ActLabel::Setup).is_some_and(|s| s.starts_with('새')));
    assert_eq!(session.act(ActLabel::Development).map(str::to_string), development);
}

#[tokio::test]
async fn test_service_failure_leaves_state_untouched() {
    let driver = MockDriver::sequence(Vec::new());
    let client = CompletionClient::new(driver.clone());
    let generator = LengthConstrainedGenerator::default();
    let mut session = revised_session(&driver).await;
    let before = session.snapshot();

    for _ in 0..3 {
        driver.push(outage());
    }
    let err = session
        .generate_act(&client, &generator, ActLabel::Setup)
        .await
        .unwrap_err();
    assert!(err.is_service());
    assert_eq!(err.status_label(), "오류");
    assert_eq!(session.snapshot(), before);

    for _ in 0..3 {
        driver.push(outage());
    }
    assert!(session.submit_feedback(&client, "다른 의견").await.is_err());
    assert_eq!(session.snapshot(), before);

    for _ in 0..3 {
        driver.push(outage());
    }
    assert!(session.submit_input(&client, "새 대본").await.is_err());
    assert_eq!(session.snapshot(), before);
}

#[tokio::test]
async fn test_resubmitting_input_discards_revision_and_acts() {
    let driver = MockDriver::sequence(Vec::new());
    let client = CompletionClient::new(driver.clone());
    let generator = LengthConstrainedGenerator::default();
    let mut session = revised_session(&driver).await;
    driver.push(MockResponse::Text(hangul(1000)));
    session.generate_act(&client, &generator, ActLabel::Setup).await.unwrap();

    driver.push(MockResponse::Text("ANALYSIS 2".to_string()));
    session.submit_input(&client, "두 번째 대본").await.unwrap();

    assert_eq!(*session.stage(), Stage::AwaitingFeedback);
    assert_eq!(session.analysis().as_deref(), Some("ANALYSIS 2"));
    assert_eq!(session.original_input().as_deref(), Some("두 번째 대본"));
    assert!(session.revision().is_none());
    assert!(session.act(ActLabel::Setup).is_none());
}

#[tokio::test]
async fn test_act_prompts_carry_only_their_context() {
    let driver = MockDriver::sequence(Vec::new());
    let generator = LengthConstrainedGenerator::default();
    let client = CompletionClient::new(driver.clone());
    let mut session = revised_session(&driver).await;
    session.set_steering_instruction("비 오는 밤으로");

    let setup = format!("기내용 {}", hangul(1000));
    let development = format!("승내용 {}", hangul(1000));
    let twist = format!("전내용 {}", hangul(1000));
    for (act, text) in [
        (ActLabel::Setup, &setup),
        (ActLabel::Development, &development),
        (ActLabel::Twist, &twist),
    ] {
        driver.push(MockResponse::Text(text.clone()));
        session.generate_act(&client, &generator, act).await.unwrap();
    }

    let development_prompt = session.act_prompt(ActLabel::Development, &generator);
    assert!(development_prompt.contains("ANALYSIS"));
    assert!(development_prompt.contains("REVISION"));
    assert!(development_prompt.contains(&setup));
    assert!(development_prompt.contains("추가 지시사항:\n비 오는 밤으로"));
    assert!(development_prompt.contains("한글 기준 800-1200자"));

    let twist_prompt = session.act_prompt(ActLabel::Twist, &generator);
    assert!(twist_prompt.contains("기내용"));
    assert!(twist_prompt.contains(&development));
    assert!(!twist_prompt.contains("ANALYSIS"));

    let resolution_prompt = session.act_prompt(ActLabel::Resolution, &generator);
    assert!(resolution_prompt.contains(&twist));
    assert!(!resolution_prompt.contains("승내용"));
    assert!(!resolution_prompt.contains("REVISION"));
}

#[tokio::test]
async fn test_target_counts_are_all_or_nothing() {
    let mut session = NarrativeSession::new();

    let total = session.set_target_counts([1000, 1500, 2000, 2500]).unwrap();
    assert_eq!(total, 7000);
    assert_eq!(session.target_counts().get(ActLabel::Resolution), 2500);

    let err = session.set_target_counts([1000, 1000, 4000, 1000]).unwrap_err();
    match err.kind() {
        StoryErrorKind::Validation(e) => match &e.kind {
            ValidationErrorKind::TargetOutOfRange { value, min, max, .. } => {
                assert_eq!((*value, *min, *max), (4000, 500, 3500));
            }
            other => panic!("Expected TargetOutOfRange, got {:?}", other),
        },
        other => panic!("Expected validation error, got {:?}", other),
    }
    assert_eq!(session.target_counts().total(), 7000);
}

#[tokio::test]
async fn test_custom_target_range() {
    let mut session = NarrativeSession::new().with_target_range(TargetRange { min: 100, max: 200 });
    assert!(session.set_target_counts([100, 150, 200, 120]).is_ok());
    assert!(session.set_target_counts([99, 150, 200, 120]).is_err());
}

#[tokio::test]
async fn test_reset_keeps_input_targets_and_instruction() {
    let driver = MockDriver::texts(["ANALYSIS", "REVISION"]);
    let client = CompletionClient::new(driver.clone());
    let generator = LengthConstrainedGenerator::default();
    let mut session = NarrativeSession::new();
    session.submit_input(&client, "X").await.unwrap();
    session.submit_feedback(&client, "의견").await.unwrap();
    assert_eq!(session.set_target_counts([1000; 4]).unwrap(), 4000);
    session.set_steering_instruction("Y");

    for act in [ActLabel::Setup, ActLabel::Development] {
        driver.push(MockResponse::Text(hangul(1000)));
        session.generate_act(&client, &generator, act).await.unwrap();
    }
    assert!(session.act(ActLabel::Development).is_some());

    session.reset();

    assert_eq!(*session.stage(), Stage::AwaitingInput);
    assert!(session.analysis().is_none());
    assert!(session.revision().is_none());
    for act in ActLabel::all() {
        assert!(session.act(act).is_none(), "{act} survived reset");
    }
    assert_eq!(session.original_input().as_deref(), Some("X"));
    assert_eq!(session.target_counts(), &TargetCounts::uniform(1000));
    assert_eq!(session.steering_instruction(), "Y");
}

#[test]
fn test_steering_length_counts_characters() {
    let mut session = NarrativeSession::new();
    assert_eq!(session.set_steering_instruction("밝은 분위기"), 6);
    assert_eq!(session.set_steering_instruction(""), 0);
}

#[test]
fn test_snapshot_serializes() {
    let session = NarrativeSession::new();
    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["stage"], "AwaitingInput");
    assert_eq!(json["target_counts"]["setup"], 2500);
}
