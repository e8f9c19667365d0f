//! Wiring of topic admin, generator, publisher and run loop.

use crate::config::Config;
use crate::run_loop::{RunLoop, RunMode, RunReport, UniformDelay};
use anyhow::Context;
use post_generator::PostGenerator;
use social_post_kafka::{
    ensure_topic, KafkaPostPublisher, KafkaTopicAdmin, PostSink, TopicAdmin, TopicStatus,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run against the Kafka cluster named in `config`.
pub async fn run(config: Config, cancel: CancellationToken) -> anyhow::Result<RunReport> {
    let admin = KafkaTopicAdmin::new(&config.producer.brokers, config.admin_timeout)
        .context("Failed to create Kafka admin client")?;
    let publisher =
        KafkaPostPublisher::new(&config.producer).context("Failed to create Kafka producer")?;

    run_with(&config, &admin, publisher, &cancel).await
}

/// Make sure the topic exists, then generate and publish posts through `sink`.
///
/// Topic errors abort before any post is generated. The returned report is
/// also logged as a one-line summary.
pub async fn run_with<A, S>(
    config: &Config,
    admin: &A,
    sink: S,
    cancel: &CancellationToken,
) -> anyhow::Result<RunReport>
where
    A: TopicAdmin + ?Sized,
    S: PostSink,
{
    let topic = &config.topic.name;

    match ensure_topic(admin, &config.topic)
        .await
        .with_context(|| format!("Failed to ensure topic '{topic}' exists"))?
    {
        TopicStatus::Created => info!("Topic '{topic}' is ready (created)"),
        TopicStatus::AlreadyExists => info!("Topic '{topic}' is ready"),
    }

    let generator = config
        .seed
        .map_or_else(PostGenerator::from_entropy, PostGenerator::from_seed);
    // Separate stream from the generator's so delays don't mirror post contents
    let delay_seed = config.seed.map(|seed| seed.wrapping_add(1));
    let delay = UniformDelay::new(config.min_delay, config.max_delay, delay_seed)
        .context("Invalid continuous-mode delay bounds")?;

    match config.mode {
        RunMode::Bounded { count } => {
            info!("Sending {count} posts to '{topic}'");
        }
        RunMode::Continuous => {
            info!(
                "Sending posts to '{topic}' every {:?} to {:?} until interrupted (Ctrl+C)",
                config.min_delay, config.max_delay
            );
        }
    }

    let mut run_loop = RunLoop::new(topic.clone(), generator, sink, delay);
    let report = run_loop
        .run(config.mode, cancel)
        .await
        .context("Failed to flush pending posts")?;

    info!(
        "Finished ({:?}): {} submitted, {} rejected, {} acknowledged, {} failed",
        report.state,
        report.submitted,
        report.rejected,
        report.delivery.acked,
        report.delivery.failed
    );

    Ok(report)
}
