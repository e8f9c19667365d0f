//! The post record published to Kafka.

use serde::{Deserialize, Serialize};

/// A single synthetic social media post.
///
/// Serialized as a flat JSON object with exactly six fields. Consumers are
/// schema-flexible, so field order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub username: String,
    pub post_content: String,
    /// In `0..=1000`.
    pub likes: u32,
    /// In `0..=100`.
    pub comments: u32,
    /// In `0..=500`.
    pub shares: u32,
    /// Millisecond precision, e.g. `2024-03-11T10:15:30.123`.
    pub timestamp: String,
}

impl PostRecord {
    /// Encode the record as the UTF-8 JSON payload sent to the broker.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
