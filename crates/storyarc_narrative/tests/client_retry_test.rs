mod test_utils;

use storyarc_error::{ServiceErrorKind, StoryErrorKind};
use storyarc_narrative::{CompletionClient, GenerationParams, RetryPolicy};
use test_utils::{MockDriver, MockResponse, outage};

#[tokio::test]
async fn test_retries_until_success() {
    let driver = MockDriver::sequence(vec![
        outage(),
        outage(),
        MockResponse::Text("분석 완료".to_string()),
    ]);
    let client = CompletionClient::new(driver.clone());

    let text = client.complete("대본").await.unwrap();

    assert_eq!(text, "분석 완료");
    assert_eq!(driver.call_count(), 3);
}

#[tokio::test]
async fn test_gives_up_after_three_attempts() {
    let driver = MockDriver::failing();
    let client = CompletionClient::new(driver.clone());

    let err = client.complete("대본").await.unwrap_err();

    assert!(err.is_service());
    assert_eq!(driver.call_count(), 3);
    match err.kind() {
        StoryErrorKind::Service(service) => match &service.kind {
            ServiceErrorKind::RetriesExhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(*attempts, 3);
                assert!(last_error.contains("mock script exhausted"));
            }
            other => panic!("Expected RetriesExhausted, got {:?}", other),
        },
        other => panic!("Expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_single_attempt_policy() {
    let driver = MockDriver::failing();
    let client =
        CompletionClient::new(driver.clone()).with_retry(RetryPolicy::default().with_max_attempts(1));

    assert!(client.complete("x").await.is_err());
    assert_eq!(driver.call_count(), 1);
}

#[tokio::test]
async fn test_blank_completion_is_retried() {
    let driver = MockDriver::texts(["   ", "본문"]);
    let client = CompletionClient::new(driver.clone());

    assert_eq!(client.complete("x").await.unwrap(), "본문");
    assert_eq!(driver.call_count(), 2);
}

#[tokio::test]
async fn test_backoff_still_bounded() {
    let driver = MockDriver::failing();
    let client = CompletionClient::new(driver.clone())
        .with_retry(RetryPolicy::default().with_backoff_ms(1))
        .with_params(GenerationParams::default().with_temperature(0.2));

    assert!(client.complete("x").await.is_err());
    assert_eq!(driver.call_count(), 3);
    assert_eq!(*client.params().temperature(), 0.2);
}
