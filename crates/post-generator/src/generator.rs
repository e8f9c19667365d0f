//! Main generator for producing post records.

use crate::generators::{numeric, text, timestamp};
use crate::record::PostRecord;
use chrono::{NaiveDateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Generator that produces one synthetic post per call.
///
/// The only state is the random source. Apart from reading the wall clock in
/// [`PostGenerator::generate`] it performs no I/O.
pub struct PostGenerator {
    rng: StdRng,
}

impl PostGenerator {
    /// Create a generator seeded from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed for reproducible output.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a post timestamped somewhere in the current year, up to now.
    pub fn generate(&mut self) -> PostRecord {
        self.generate_at(Utc::now().naive_utc())
    }

    /// Generate a post as if the current time were `now`.
    pub fn generate_at(&mut self, now: NaiveDateTime) -> PostRecord {
        let username = text::generate_username(&mut self.rng);
        let post_content = text::generate_post_content(&mut self.rng);
        let engagement = numeric::generate_engagement(&mut self.rng);
        let created = timestamp::generate_this_year(&mut self.rng, now);

        PostRecord {
            username,
            post_content,
            likes: engagement.likes,
            comments: engagement.comments,
            shares: engagement.shares,
            timestamp: timestamp::format_timestamp(created),
        }
    }
}

impl Default for PostGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl std::fmt::Debug for PostGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostGenerator").finish_non_exhaustive()
    }
}
