//! Fake social media post generator for social-post-stream.
//!
//! This crate provides the `PostGenerator` which produces one synthetic
//! `PostRecord` per call. The generator owns its random source, so a seeded
//! generator paired with a fixed clock reading yields reproducible records.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  PostGenerator   │
//! │                  │
//! │  - rng (StdRng)  │
//! └────────┬─────────┘
//!          │  generators::{text, numeric, timestamp}
//!          ▼
//!    PostRecord { username, post_content, likes, comments, shares, timestamp }
//!          │
//!          ▼
//!    JSON bytes (serde_json)
//! ```
//!
//! # Example
//!
//! ```rust
//! use post_generator::PostGenerator;
//!
//! let mut generator = PostGenerator::from_seed(42);
//! let post = generator.generate();
//! assert!(post.likes <= 1000);
//! assert_eq!(post.timestamp.len(), 23);
//! ```

pub mod generator;
pub mod generators;
pub mod record;

// Re-exports for convenience
pub use generator::PostGenerator;
pub use generators::timestamp::{format_timestamp, TIMESTAMP_LEN};
pub use record::PostRecord;
