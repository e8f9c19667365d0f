//! Broker-backed run; needs a reachable cluster.

use social_post_kafka::{ProducerSettings, TopicSpec};
use social_post_stream::{Config, RunMode, RunState};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
#[ignore = "requires a running Kafka broker (KAFKA_BROKERS)"]
async fn test_send_to_kafka() {
    tracing_subscriber::fmt()
        .with_env_filter("social_post_stream=debug,social_post_kafka=debug")
        .try_init()
        .ok();

    let brokers = std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9093".into());
    let topic = format!(
        "social-posts-e2e-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis()
    );

    let config = Config {
        mode: RunMode::Bounded { count: 5 },
        topic: TopicSpec::new(topic),
        producer: ProducerSettings::new(brokers)
            .with_flush_timeout(Some(Duration::from_secs(30))),
        ..Config::default()
    };

    let report = social_post_stream::run(config, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Exhausted);
    assert_eq!(report.submitted, 5);
    assert_eq!(report.delivery.acked, 5);
}
