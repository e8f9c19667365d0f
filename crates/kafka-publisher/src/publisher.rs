//! JSON post publisher.
//!
//! `send` serializes a post and hands it to librdkafka without waiting for
//! the broker. When librdkafka's local queue is full, `send` waits for room
//! instead of dropping the post. Each enqueued message gets a delivery task
//! that logs the outcome once the broker acknowledges or rejects it. Failed
//! deliveries are logged and counted, never retried and never reported back
//! to the caller.

use crate::error::PublishError;
use async_trait::async_trait;
use post_generator::PostRecord;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::message::OwnedMessage;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use rdkafka::ClientConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Default `message.timeout.ms` for the producer.
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `client.id` reported to the broker.
pub const DEFAULT_CLIENT_ID: &str = "send-social-media-posts";

/// Pause between enqueue attempts while the local queue is full.
const QUEUE_FULL_BACKOFF: Duration = Duration::from_millis(100);

/// Settings used to build the underlying `FutureProducer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerSettings {
    pub brokers: String,
    pub client_id: String,
    /// How long librdkafka keeps retrying a message before reporting failure.
    pub message_timeout: Duration,
    /// Bound on the final flush; `None` waits forever.
    pub flush_timeout: Option<Duration>,
    /// `queue.buffering.max.messages`; `None` keeps librdkafka's default.
    pub max_queued_messages: Option<u32>,
}

impl ProducerSettings {
    pub fn new(brokers: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
            flush_timeout: None,
            max_queued_messages: None,
        }
    }

    pub fn with_message_timeout(mut self, timeout: Duration) -> Self {
        self.message_timeout = timeout;
        self
    }

    pub fn with_flush_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.flush_timeout = timeout;
        self
    }

    pub fn with_max_queued_messages(mut self, max: Option<u32>) -> Self {
        self.max_queued_messages = max;
        self
    }

    /// librdkafka configuration for these settings.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set("client.id", &self.client_id)
            .set(
                "message.timeout.ms",
                self.message_timeout.as_millis().to_string(),
            );
        if let Some(max) = self.max_queued_messages {
            config.set("queue.buffering.max.messages", max.to_string());
        }
        config
    }
}

/// Delivery counters shared between the publisher and its delivery tasks.
#[derive(Debug, Default)]
pub struct DeliveryStats {
    acked: AtomicU64,
    failed: AtomicU64,
}

impl DeliveryStats {
    pub(crate) fn record_ack(&self) {
        self.acked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> DeliverySummary {
        DeliverySummary {
            acked: self.acked.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of [`DeliveryStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    pub acked: u64,
    pub failed: u64,
}

/// Destination for generated posts.
#[async_trait]
pub trait PostSink: Send {
    /// Submit one post without waiting for the broker's acknowledgement.
    ///
    /// Only waits while the local queue has no room. An error here means the
    /// post never left the process (it could not be serialized or the producer
    /// refused it). Broker-side failures are only logged by the delivery task.
    async fn send(&mut self, topic: &str, post: &PostRecord) -> Result<(), PublishError>;

    /// Wait until every submitted post has been acknowledged or has failed.
    async fn flush(&mut self) -> Result<DeliverySummary, PublishError>;
}

/// [`PostSink`] backed by an rdkafka `FutureProducer`.
pub struct KafkaPostPublisher {
    producer: FutureProducer,
    deliveries: JoinSet<()>,
    stats: Arc<DeliveryStats>,
    flush_timeout: Option<Duration>,
}

impl KafkaPostPublisher {
    /// Create a publisher; no connection is attempted until the first send.
    pub fn new(settings: &ProducerSettings) -> Result<Self, PublishError> {
        let producer: FutureProducer = settings.client_config().create()?;

        Ok(Self {
            producer,
            deliveries: JoinSet::new(),
            stats: Arc::new(DeliveryStats::default()),
            flush_timeout: settings.flush_timeout,
        })
    }

    /// Number of delivery reports not yet collected.
    pub fn in_flight(&self) -> usize {
        self.deliveries.len()
    }

    /// Collect finished delivery tasks; join errors count as failed deliveries.
    fn reap_finished(&mut self) {
        while let Some(joined) = self.deliveries.try_join_next() {
            if let Err(err) = joined {
                self.stats.record_failure();
                warn!("Delivery task failed: {err}");
            }
        }
    }
}

impl std::fmt::Debug for KafkaPostPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaPostPublisher")
            .field("in_flight", &self.deliveries.len())
            .field("stats", &self.stats)
            .field("flush_timeout", &self.flush_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PostSink for KafkaPostPublisher {
    async fn send(&mut self, topic: &str, post: &PostRecord) -> Result<(), PublishError> {
        // Keep the set from growing without bound in continuous mode
        self.reap_finished();

        let payload = post.to_json_bytes()?;
        let mut record = FutureRecord::<(), Vec<u8>>::to(topic).payload(&payload);

        let delivery = loop {
            match self.producer.send_result(record) {
                Ok(delivery) => break delivery,
                Err((KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull), returned)) => {
                    debug!(
                        "Producer queue full; waiting {QUEUE_FULL_BACKOFF:?} with {} reports outstanding",
                        self.deliveries.len()
                    );
                    record = returned;
                    tokio::time::sleep(QUEUE_FULL_BACKOFF).await;
                    self.reap_finished();
                }
                Err((source, _)) => {
                    return Err(PublishError::Enqueue {
                        topic: topic.to_string(),
                        source,
                    });
                }
            }
        };

        let topic = topic.to_string();
        let stats = Arc::clone(&self.stats);
        self.deliveries.spawn(async move {
            match delivery.await {
                Ok(result) => log_delivery(&topic, result, &stats),
                Err(_canceled) => {
                    stats.record_failure();
                    error!("Error encountered: delivery report for '{topic}' was dropped");
                }
            }
        });

        Ok(())
    }

    async fn flush(&mut self) -> Result<DeliverySummary, PublishError> {
        let producer = self.producer.clone();
        let timeout = self.flush_timeout.map_or(Timeout::Never, Timeout::After);

        debug!(
            "Flushing producer with {} delivery reports outstanding",
            self.deliveries.len()
        );

        // Producer::flush blocks the calling thread until the queue drains
        let flushed = tokio::task::spawn_blocking(move || producer.flush(timeout)).await?;
        if let Err(err) = flushed {
            warn!(
                "Flush did not complete; abandoning {} delivery reports",
                self.deliveries.len()
            );
            self.deliveries.abort_all();
            return Err(PublishError::Flush(err));
        }

        while let Some(joined) = self.deliveries.join_next().await {
            joined?;
        }

        Ok(self.stats.summary())
    }
}

/// Log and count one delivery report.
///
/// Success is logged with the topic and partition written to; failure is
/// logged and otherwise dropped.
pub(crate) fn log_delivery(
    topic: &str,
    result: Result<(i32, i64), (KafkaError, OwnedMessage)>,
    stats: &DeliveryStats,
) {
    match result {
        Ok((partition, offset)) => {
            stats.record_ack();
            info!("Message sent to {topic} partition {partition}");
            debug!("Message offset in {topic}/{partition}: {offset}");
        }
        Err((err, _message)) => {
            stats.record_failure();
            error!("Error encountered: {err}");
        }
    }
}
