//! Command-line options and the validated run configuration.

mod duration;

pub use duration::parse_duration;

use crate::run_loop::{RunMode, UniformDelay};
use anyhow::Context;
use clap::{Args, Parser};
use social_post_kafka::admin::DEFAULT_ADMIN_TIMEOUT;
use social_post_kafka::{ProducerSettings, TopicSpec};
use std::time::Duration;
use tracing::debug;

/// Default bootstrap servers when neither `--kafka-brokers` nor
/// `KAFKA_BROKERS` is given.
pub const DEFAULT_KAFKA_BROKERS: &str = "localhost:9093";

/// Posts sent in bounded mode when `--count` is omitted.
pub const DEFAULT_COUNT: u64 = 10;

#[derive(Parser, Clone, Debug)]
#[command(name = "send-social-media-posts")]
#[command(about = "Send fake social media posts to a Kafka topic")]
#[command(long_about = None)]
pub struct Cli {
    /// Kafka topic to which the posts will be sent
    pub topic: String,

    /// Number of posts to send (ignored with --continuous)
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    pub count: u64,

    /// Send posts continuously until interrupted with Ctrl+C
    #[arg(long)]
    pub continuous: bool,

    /// Seed for reproducible posts and delays (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub kafka: KafkaOpts,

    #[command(flatten)]
    pub pacing: PacingOpts,
}

/// Broker connection and topic creation options.
#[derive(Args, Clone, Debug)]
pub struct KafkaOpts {
    /// Kafka brokers (comma-separated, e.g., "localhost:9093")
    #[arg(long, env = "KAFKA_BROKERS", default_value = DEFAULT_KAFKA_BROKERS)]
    pub kafka_brokers: String,

    /// Number of partitions used when the topic has to be created
    #[arg(long, default_value = "1")]
    pub partitions: i32,

    /// Replication factor used when the topic has to be created
    #[arg(long, default_value = "1")]
    pub replication_factor: i32,

    /// How long the producer retries a message before reporting it failed
    #[arg(long, default_value = "30s")]
    pub message_timeout: String,

    /// Upper bound on the final flush (waits forever when omitted)
    #[arg(long)]
    pub flush_timeout: Option<String>,

    /// Timeout for the topic metadata and create-topic requests
    #[arg(long, default_value = "10s")]
    pub admin_timeout: String,
}

/// Continuous-mode pacing options.
#[derive(Args, Clone, Debug)]
pub struct PacingOpts {
    /// Shortest pause between posts in continuous mode
    #[arg(long, default_value = "1s")]
    pub min_delay: String,

    /// Longest pause between posts in continuous mode
    #[arg(long, default_value = "30s")]
    pub max_delay: String,
}

/// Everything a run needs, parsed and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: RunMode,
    pub topic: TopicSpec,
    pub producer: ProducerSettings,
    pub admin_timeout: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: RunMode::Bounded { count: 10 },
            topic: TopicSpec::new(""),
            producer: ProducerSettings::new(DEFAULT_KAFKA_BROKERS),
            admin_timeout: DEFAULT_ADMIN_TIMEOUT,
            min_delay: UniformDelay::DEFAULT_MIN,
            max_delay: UniformDelay::DEFAULT_MAX,
            seed: None,
        }
    }
}

impl Config {
    /// Check the combinations clap cannot check on its own.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.producer.brokers.trim().is_empty() {
            anyhow::bail!("Kafka brokers must not be empty");
        }
        self.topic.validate().context("Invalid topic settings")?;
        if self.min_delay > self.max_delay {
            anyhow::bail!(
                "--min-delay ({:?}) must not exceed --max-delay ({:?})",
                self.min_delay,
                self.max_delay
            );
        }
        Ok(())
    }
}

impl TryFrom<Cli> for Config {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> anyhow::Result<Self> {
        if let Some(count) = ignored_count(&cli) {
            debug!("Ignoring --count {count} in continuous mode");
        }
        let mode = if cli.continuous {
            RunMode::Continuous
        } else {
            RunMode::Bounded { count: cli.count }
        };

        let message_timeout = parse_duration(&cli.kafka.message_timeout)
            .context("Invalid --message-timeout")?;
        let flush_timeout = cli
            .kafka
            .flush_timeout
            .as_deref()
            .map(parse_duration)
            .transpose()
            .context("Invalid --flush-timeout")?;
        let admin_timeout =
            parse_duration(&cli.kafka.admin_timeout).context("Invalid --admin-timeout")?;
        let min_delay = parse_duration(&cli.pacing.min_delay).context("Invalid --min-delay")?;
        let max_delay = parse_duration(&cli.pacing.max_delay).context("Invalid --max-delay")?;

        let config = Self {
            mode,
            topic: TopicSpec::new(cli.topic)
                .with_partitions(cli.kafka.partitions)
                .with_replication_factor(cli.kafka.replication_factor),
            producer: ProducerSettings::new(cli.kafka.kafka_brokers)
                .with_message_timeout(message_timeout)
                .with_flush_timeout(flush_timeout),
            admin_timeout,
            min_delay,
            max_delay,
            seed: cli.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

/// An explicit `--count` that continuous mode will not honour.
fn ignored_count(cli: &Cli) -> Option<u64> {
    (cli.continuous && cli.count != DEFAULT_COUNT).then_some(cli.count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_cli(args: &[&str]) -> clap::error::Result<Cli> {
        let argv = std::iter::once("send-social-media-posts").chain(args.iter().copied());
        Cli::try_parse_from(argv)
    }

    fn parse(args: &[&str]) -> anyhow::Result<Config> {
        Config::try_from(parse_cli(args)?)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["posts"]).unwrap();

        assert_eq!(config.mode, RunMode::Bounded { count: 10 });
        assert_eq!(config.topic, TopicSpec::new("posts"));
        assert_eq!(config.min_delay, Duration::from_secs(1));
        assert_eq!(config.max_delay, Duration::from_secs(30));
        assert_eq!(config.producer.flush_timeout, None);
        assert_eq!(config.producer.message_timeout, Duration::from_secs(30));
        assert_eq!(config.admin_timeout, Duration::from_secs(10));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_count_and_continuous() {
        let bounded = parse(&["posts", "--count", "5"]).unwrap();
        assert_eq!(bounded.mode, RunMode::Bounded { count: 5 });

        let continuous = parse(&["posts", "--count", "5", "--continuous"]).unwrap();
        assert_eq!(continuous.mode, RunMode::Continuous);

        let zero = parse(&["posts", "--count", "0"]).unwrap();
        assert_eq!(zero.mode, RunMode::Bounded { count: 0 });
    }

    #[test]
    fn test_count_ignored_in_continuous_mode() {
        let explicit = parse_cli(&["posts", "--count", "5", "--continuous"]).unwrap();
        assert_eq!(ignored_count(&explicit), Some(5));

        let omitted = parse_cli(&["posts", "--continuous"]).unwrap();
        assert_eq!(ignored_count(&omitted), None);

        let bounded = parse_cli(&["posts", "--count", "5"]).unwrap();
        assert_eq!(ignored_count(&bounded), None);
    }

    #[test]
    fn test_topic_is_required() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_negative_count_rejected() {
        assert!(parse(&["posts", "--count", "-1"]).is_err());
    }

    #[test]
    fn test_kafka_options() {
        let config = parse(&[
            "posts",
            "--kafka-brokers",
            "kafka:9092",
            "--partitions",
            "3",
            "--replication-factor",
            "2",
            "--message-timeout",
            "5s",
            "--flush-timeout",
            "1m",
        ])
        .unwrap();

        assert_eq!(config.producer.brokers, "kafka:9092");
        assert_eq!(config.topic.partitions, 3);
        assert_eq!(config.topic.replication_factor, 2);
        assert_eq!(config.producer.message_timeout, Duration::from_secs(5));
        assert_eq!(config.producer.flush_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(parse(&["posts", "--min-delay", "10s", "--max-delay", "5s"]).is_err());
        assert!(parse(&["posts", "--partitions", "0"]).is_err());
        assert!(parse(&["posts", "--kafka-brokers", ""]).is_err());
        assert!(parse(&["posts", "--flush-timeout", "soon"]).is_err());
    }

    #[test]
    fn test_delay_bounds() {
        let config = parse(&["posts", "--min-delay", "500ms", "--max-delay", "2s"]).unwrap();
        assert_eq!(config.min_delay, Duration::from_millis(500));
        assert_eq!(config.max_delay, Duration::from_secs(2));
    }
}
