//! In-memory doubles for [`TopicAdmin`] and [`PostSink`].
//!
//! These let the run loop and the topic check be exercised without a broker.

use crate::admin::{TopicAdmin, TopicSpec, TopicStatus};
use crate::error::{AdminError, PublishError};
use crate::publisher::{DeliverySummary, PostSink};
use async_trait::async_trait;
use post_generator::PostRecord;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Topic admin holding the broker's topic list in memory.
#[derive(Debug, Default)]
pub struct InMemoryTopicAdmin {
    topics: Mutex<Vec<String>>,
    created: Mutex<Vec<TopicSpec>>,
    list_calls: AtomicUsize,
    unreachable: bool,
}

impl InMemoryTopicAdmin {
    pub fn with_topics<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: Mutex::new(topics.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// An admin whose every request fails as if the broker were down.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn topics(&self) -> Vec<String> {
        self.topics.lock().unwrap().clone()
    }

    /// Every create-topic request received, in order.
    pub fn created(&self) -> Vec<TopicSpec> {
        self.created.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn broker_down() -> AdminError {
        AdminError::Kafka(KafkaError::MetadataFetch(
            RDKafkaErrorCode::BrokerTransportFailure,
        ))
    }
}

#[async_trait]
impl TopicAdmin for InMemoryTopicAdmin {
    async fn list_topics(&self) -> Result<Vec<String>, AdminError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(Self::broker_down());
        }
        Ok(self.topics())
    }

    async fn create_topic(&self, spec: &TopicSpec) -> Result<TopicStatus, AdminError> {
        if self.unreachable {
            return Err(Self::broker_down());
        }
        self.created.lock().unwrap().push(spec.clone());

        let mut topics = self.topics.lock().unwrap();
        if topics.contains(&spec.name) {
            return Ok(TopicStatus::AlreadyExists);
        }
        topics.push(spec.name.clone());
        Ok(TopicStatus::Created)
    }
}

/// A payload accepted by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPost {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl SentPost {
    pub fn decode(&self) -> Result<PostRecord, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

type SendHook = Box<dyn FnMut(usize) + Send>;

/// Sink that records every payload and every flush.
#[derive(Default)]
pub struct RecordingSink {
    sent: Vec<SentPost>,
    send_calls: usize,
    flush_calls: usize,
    rejected_calls: Vec<usize>,
    on_send: Option<SendHook>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse the given send calls (zero-based) as if the local queue were full.
    pub fn rejecting(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.rejected_calls = calls.into_iter().collect();
        self
    }

    /// Run `hook` after every send call with the number of calls so far.
    pub fn on_send(mut self, hook: impl FnMut(usize) + Send + 'static) -> Self {
        self.on_send = Some(Box::new(hook));
        self
    }

    /// Payloads accepted so far.
    pub fn sent(&self) -> &[SentPost] {
        &self.sent
    }

    /// Send calls, including rejected ones.
    pub fn send_calls(&self) -> usize {
        self.send_calls
    }

    pub fn flush_calls(&self) -> usize {
        self.flush_calls
    }
}

impl std::fmt::Debug for RecordingSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSink")
            .field("sent", &self.sent.len())
            .field("send_calls", &self.send_calls)
            .field("flush_calls", &self.flush_calls)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PostSink for RecordingSink {
    async fn send(&mut self, topic: &str, post: &PostRecord) -> Result<(), PublishError> {
        let call = self.send_calls;
        self.send_calls += 1;

        let result = if self.rejected_calls.contains(&call) {
            Err(PublishError::Enqueue {
                topic: topic.to_string(),
                source: KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull),
            })
        } else {
            post.to_json_bytes().map_err(PublishError::from).map(|payload| {
                self.sent.push(SentPost {
                    topic: topic.to_string(),
                    payload,
                });
            })
        };

        if let Some(hook) = self.on_send.as_mut() {
            hook(self.send_calls);
        }
        result
    }

    async fn flush(&mut self) -> Result<DeliverySummary, PublishError> {
        self.flush_calls += 1;
        Ok(DeliverySummary {
            acked: self.sent.len() as u64,
            failed: 0,
        })
    }
}
