//! End-to-end tests for the send pipeline
//!
//! These drive `run_with` through the in-memory topic admin and recording
//! sink, so no broker is needed. The broker-backed test is ignored unless
//! run explicitly with `KAFKA_BROKERS` pointing at a cluster.

mod bounded;
mod continuous;
mod kafka;
mod shared_sink;
