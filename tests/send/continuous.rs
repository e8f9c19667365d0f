//! Continuous runs ended by cancelling the token, as Ctrl+C does.

use social_post_kafka::testing::{InMemoryTopicAdmin, RecordingSink};
use social_post_kafka::TopicSpec;
use social_post_stream::{run_with, Config, RunMode, RunState};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::shared_sink::shared_sink;

fn continuous_config() -> Config {
    Config {
        mode: RunMode::Continuous,
        topic: TopicSpec::new("social-posts"),
        seed: Some(7),
        ..Config::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_after_three_sends() {
    let config = continuous_config();
    let admin = InMemoryTopicAdmin::with_topics(["social-posts"]);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let sink = RecordingSink::new().on_send(move |calls| {
        if calls == 3 {
            trigger.cancel();
        }
    });

    let report = run_with(&config, &admin, sink, &cancel).await.unwrap();

    assert_eq!(report.state, RunState::Stopped);
    assert_eq!(report.submitted, 3);
    assert_eq!(report.delivery.acked, 3);
}

#[tokio::test(start_paused = true)]
async fn test_sends_are_paced_within_bounds() {
    let config = continuous_config();
    let admin = InMemoryTopicAdmin::default();
    let cancel = CancellationToken::new();
    let (sink, handle) = shared_sink();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        // Long enough for several sends at up to 30s apart
        tokio::time::sleep(Duration::from_secs(300)).await;
        trigger.cancel();
    });

    let start = tokio::time::Instant::now();
    let report = run_with(&config, &admin, sink, &cancel).await.unwrap();
    let elapsed = start.elapsed();

    let recorded = handle.lock().unwrap();
    let sends = recorded.sent.len() as u64;
    assert_eq!(report.submitted, sends);
    assert_eq!(recorded.flush_calls, 1);

    // Every pause is between 1s and 30s, so 300s fits between 10 and 300 sends
    assert!((10..=300).contains(&sends), "unexpected send count {sends}");
    assert!(elapsed >= Duration::from_secs(300));
    assert!(elapsed < Duration::from_secs(301));
}
