//! Destination topic management.
//!
//! The topic is checked once at startup: if the broker metadata does not list
//! it, a single create-topic request is issued with the configured partition
//! count and replication factor.

use crate::error::AdminError;
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::RDKafkaErrorCode;
use rdkafka::ClientConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for metadata and create-topic requests.
pub const DEFAULT_ADMIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Parameters used when the topic has to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpec {
    pub name: String,
    pub partitions: i32,
    pub replication_factor: i32,
}

impl TopicSpec {
    /// A single-partition, single-replica topic.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partitions: 1,
            replication_factor: 1,
        }
    }

    pub fn with_partitions(mut self, partitions: i32) -> Self {
        self.partitions = partitions;
        self
    }

    pub fn with_replication_factor(mut self, replication_factor: i32) -> Self {
        self.replication_factor = replication_factor;
        self
    }

    /// Reject specs the broker would refuse anyway, before any request is made.
    pub fn validate(&self) -> Result<(), AdminError> {
        if self.name.trim().is_empty() {
            return Err(AdminError::InvalidTopicSpec(
                "topic name must not be empty".to_string(),
            ));
        }
        if self.partitions < 1 {
            return Err(AdminError::InvalidTopicSpec(format!(
                "partitions must be at least 1, got {}",
                self.partitions
            )));
        }
        if self.replication_factor < 1 {
            return Err(AdminError::InvalidTopicSpec(format!(
                "replication factor must be at least 1, got {}",
                self.replication_factor
            )));
        }
        Ok(())
    }
}

/// Outcome of [`ensure_topic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicStatus {
    AlreadyExists,
    Created,
}

/// Broker operations needed to make sure the destination topic exists.
#[async_trait]
pub trait TopicAdmin: Send + Sync {
    /// Names of all topics currently known to the broker.
    async fn list_topics(&self) -> Result<Vec<String>, AdminError>;

    /// Issue one create-topic request.
    ///
    /// Returns [`TopicStatus::AlreadyExists`] when another client created the
    /// topic in the meantime.
    async fn create_topic(&self, spec: &TopicSpec) -> Result<TopicStatus, AdminError>;
}

/// Make sure the topic described by `spec` exists, creating it if absent.
///
/// No create request is sent when the topic is already listed. Errors are
/// returned to the caller as-is; nothing is retried.
pub async fn ensure_topic<A: TopicAdmin + ?Sized>(
    admin: &A,
    spec: &TopicSpec,
) -> Result<TopicStatus, AdminError> {
    spec.validate()?;

    let existing = admin.list_topics().await?;
    if existing.iter().any(|name| name == &spec.name) {
        debug!("Topic '{}' already exists", spec.name);
        return Ok(TopicStatus::AlreadyExists);
    }

    info!(
        "Creating topic '{}' ({} partitions, replication factor {})",
        spec.name, spec.partitions, spec.replication_factor
    );
    admin.create_topic(spec).await
}

/// [`TopicAdmin`] backed by an rdkafka `AdminClient`.
pub struct KafkaTopicAdmin {
    client: Arc<AdminClient<DefaultClientContext>>,
    timeout: Duration,
}

impl KafkaTopicAdmin {
    /// Create an admin client for the given bootstrap servers.
    ///
    /// `timeout` bounds both the metadata request and the create-topic
    /// operation.
    pub fn new(brokers: &str, timeout: Duration) -> Result<Self, AdminError> {
        let client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .create()?;

        Ok(Self {
            client: Arc::new(client),
            timeout,
        })
    }
}

impl std::fmt::Debug for KafkaTopicAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaTopicAdmin")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TopicAdmin for KafkaTopicAdmin {
    async fn list_topics(&self) -> Result<Vec<String>, AdminError> {
        let client = Arc::clone(&self.client);
        let timeout = self.timeout;

        // fetch_metadata blocks the calling thread until the broker answers
        let names = tokio::task::spawn_blocking(move || {
            client
                .inner()
                .fetch_metadata(None, timeout)
                .map(|metadata| {
                    metadata
                        .topics()
                        .iter()
                        .map(|topic| topic.name().to_string())
                        .collect::<Vec<_>>()
                })
        })
        .await??;

        debug!("Broker lists {} topics", names.len());
        Ok(names)
    }

    async fn create_topic(&self, spec: &TopicSpec) -> Result<TopicStatus, AdminError> {
        let new_topic = NewTopic::new(
            &spec.name,
            spec.partitions,
            TopicReplication::Fixed(spec.replication_factor),
        );
        let opts = AdminOptions::new().operation_timeout(Some(self.timeout));

        let results = self.client.create_topics(&[new_topic], &opts).await?;

        let mut status = TopicStatus::Created;
        for result in results {
            match result {
                Ok(topic_name) => {
                    info!("Topic '{}' created successfully", topic_name);
                }
                Err((topic_name, RDKafkaErrorCode::TopicAlreadyExists)) => {
                    info!("Topic '{}' already exists", topic_name);
                    status = TopicStatus::AlreadyExists;
                }
                Err((topic_name, code)) => {
                    return Err(AdminError::TopicCreation {
                        topic: topic_name,
                        code,
                    });
                }
            }
        }

        Ok(status)
    }
}
