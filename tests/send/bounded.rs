//! Bounded runs from the command line down to the recorded payloads.

use clap::Parser;
use post_generator::{PostRecord, TIMESTAMP_LEN};
use social_post_kafka::testing::{InMemoryTopicAdmin, RecordingSink};
use social_post_kafka::TopicSpec;
use social_post_stream::{run_with, Cli, Config, RunState};
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;

use crate::shared_sink::shared_sink;

fn config_from_args(args: &[&str]) -> Config {
    let argv = std::iter::once("send-social-media-posts").chain(args.iter().copied());
    Config::try_from(Cli::try_parse_from(argv).unwrap()).unwrap()
}

#[tokio::test]
async fn test_default_run_creates_topic_and_sends_ten() {
    let config = config_from_args(&["social-posts", "--seed", "42"]);
    let admin = InMemoryTopicAdmin::default();
    let (sink, handle) = shared_sink();

    let report = assert_ok!(run_with(&config, &admin, sink, &CancellationToken::new()).await);

    assert_eq!(report.state, RunState::Exhausted);
    assert_eq!(report.submitted, 10);
    assert_eq!(admin.created(), vec![TopicSpec::new("social-posts")]);

    let recorded = handle.lock().unwrap();
    assert_eq!(recorded.sent.len(), 10);
    assert_eq!(recorded.flush_calls, 1);
}

#[tokio::test]
async fn test_existing_topic_is_reused() {
    let config = config_from_args(&["social-posts", "--count", "5"]);
    let admin = InMemoryTopicAdmin::with_topics(["social-posts"]);

    let report = assert_ok!(
        run_with(&config, &admin, RecordingSink::new(), &CancellationToken::new()).await
    );

    assert_eq!(report.submitted, 5);
    assert!(admin.created().is_empty());
}

#[tokio::test]
async fn test_count_zero_sends_nothing() {
    let config = config_from_args(&["social-posts", "--count", "0"]);
    let admin = InMemoryTopicAdmin::with_topics(["social-posts"]);
    let (sink, handle) = shared_sink();

    let report = assert_ok!(run_with(&config, &admin, sink, &CancellationToken::new()).await);

    assert_eq!(report.submitted, 0);
    let recorded = handle.lock().unwrap();
    assert!(recorded.sent.is_empty());
    assert_eq!(recorded.flush_calls, 1);
}

#[tokio::test]
async fn test_unreachable_broker_aborts_before_sending() {
    let config = config_from_args(&["social-posts"]);
    let admin = InMemoryTopicAdmin::unreachable();
    let (sink, handle) = shared_sink();

    let err = run_with(&config, &admin, sink, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("Failed to ensure topic 'social-posts' exists"));
    let recorded = handle.lock().unwrap();
    assert!(recorded.sent.is_empty());
    assert_eq!(recorded.flush_calls, 0);
}

#[tokio::test]
async fn test_payloads_match_post_schema() {
    let config = config_from_args(&["social-posts", "--count", "25"]);
    let admin = InMemoryTopicAdmin::default();
    let (sink, handle) = shared_sink();

    assert_ok!(run_with(&config, &admin, sink, &CancellationToken::new()).await);

    let recorded = handle.lock().unwrap();
    for payload in &recorded.sent {
        let post: PostRecord = serde_json::from_slice(payload).unwrap();
        assert!(post.likes <= 1000);
        assert!(post.comments <= 100);
        assert!(post.shares <= 500);
        assert_eq!(post.timestamp.len(), TIMESTAMP_LEN);
    }
}
