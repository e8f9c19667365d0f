//! A sink whose recordings stay reachable after it is moved into `run_with`.

use async_trait::async_trait;
use post_generator::PostRecord;
use social_post_kafka::{DeliverySummary, PostSink, PublishError};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct Recorded {
    pub sent: Vec<Vec<u8>>,
    pub flush_calls: usize,
}

pub struct SharedSink(Arc<Mutex<Recorded>>);

pub fn shared_sink() -> (SharedSink, Arc<Mutex<Recorded>>) {
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    (SharedSink(Arc::clone(&recorded)), recorded)
}

#[async_trait]
impl PostSink for SharedSink {
    async fn send(&mut self, _topic: &str, post: &PostRecord) -> Result<(), PublishError> {
        let payload = post.to_json_bytes()?;
        self.0.lock().unwrap().sent.push(payload);
        Ok(())
    }

    async fn flush(&mut self) -> Result<DeliverySummary, PublishError> {
        let mut recorded = self.0.lock().unwrap();
        recorded.flush_calls += 1;
        Ok(DeliverySummary {
            acked: recorded.sent.len() as u64,
            failed: 0,
        })
    }
}
