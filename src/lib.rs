//! social-post-stream
//!
//! Generates fake social media posts and publishes them as JSON to a Kafka
//! topic, either a fixed number at once or continuously at random intervals.
//! It exists to feed demo and test traffic to downstream consumers.
//!
//! # Components
//!
//! - [`post_generator`] - builds `PostRecord`s from fake names and text
//! - [`social_post_kafka`] - topic admin and the JSON publisher
//! - [`run_loop`] - bounded and continuous generate-and-publish loops
//! - [`config`] - command-line options and validation
//! - [`shutdown`] - Ctrl+C to cancellation token
//!
//! # CLI Usage
//!
//! ```bash
//! # Send 10 posts (the default) and exit
//! send-social-media-posts social-posts
//!
//! # Send 500 posts to a remote cluster
//! send-social-media-posts social-posts --count 500 --kafka-brokers kafka:9092
//!
//! # Stream posts every 1-30 seconds until Ctrl+C
//! send-social-media-posts social-posts --continuous
//! ```

pub mod app;
pub mod config;
pub mod run_loop;
pub mod shutdown;

pub use app::{run, run_with};
pub use config::{Cli, Config};
pub use run_loop::{DelayPolicy, RunLoop, RunMode, RunReport, RunState, UniformDelay};
