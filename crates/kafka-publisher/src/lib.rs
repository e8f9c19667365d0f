//! Kafka plumbing for social-post-stream.
//!
//! This crate provides the two broker-facing pieces of the tool:
//!
//! - **Topic admin**: [`ensure_topic`] checks the broker metadata and creates
//!   the destination topic when it is missing.
//! - **Publisher**: [`KafkaPostPublisher`] serializes a [`PostRecord`] to JSON
//!   and enqueues it without waiting; delivery reports are logged as they
//!   arrive and [`PostSink::flush`] waits for all of them.
//!
//! Both are reached through traits ([`TopicAdmin`], [`PostSink`]) so the run
//! loop can be driven by the in-memory doubles in [`testing`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use post_generator::PostGenerator;
//! use social_post_kafka::{
//!     ensure_topic, KafkaPostPublisher, KafkaTopicAdmin, PostSink, ProducerSettings, TopicSpec,
//! };
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let admin = KafkaTopicAdmin::new("localhost:9093", Duration::from_secs(10))?;
//!     ensure_topic(&admin, &TopicSpec::new("social-posts")).await?;
//!
//!     let mut publisher = KafkaPostPublisher::new(&ProducerSettings::new("localhost:9093"))?;
//!     let post = PostGenerator::from_entropy().generate();
//!     publisher.send("social-posts", &post).await?;
//!     publisher.flush().await?;
//!     Ok(())
//! }
//! ```

pub mod admin;
pub mod error;
pub mod publisher;
pub mod testing;

// Re-exports for convenience
pub use admin::{ensure_topic, KafkaTopicAdmin, TopicAdmin, TopicSpec, TopicStatus};
pub use error::{AdminError, PublishError};
pub use post_generator::PostRecord;
pub use publisher::{DeliveryStats, DeliverySummary, KafkaPostPublisher, PostSink, ProducerSettings};
