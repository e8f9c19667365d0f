//! Error types for topic administration and publishing.

use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use thiserror::Error;

/// Errors that can occur while checking or creating the destination topic.
///
/// All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    #[error("Invalid topic spec: {0}")]
    InvalidTopicSpec(String),

    #[error("Failed to create topic '{topic}': {code}")]
    TopicCreation {
        topic: String,
        code: RDKafkaErrorCode,
    },

    #[error("Admin task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors that can occur while publishing posts.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    #[error("Failed to serialize post: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to enqueue post for topic '{topic}': {source}")]
    Enqueue {
        topic: String,
        #[source]
        source: KafkaError,
    },

    #[error("Failed to flush producer: {0}")]
    Flush(#[source] KafkaError),

    #[error("Delivery task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
