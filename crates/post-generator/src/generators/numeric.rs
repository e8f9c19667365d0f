//! Engagement counter generators.

use rand::Rng;
use std::ops::RangeInclusive;

/// Range of the `likes` counter.
pub const LIKES_RANGE: RangeInclusive<u32> = 0..=1000;

/// Range of the `comments` counter.
pub const COMMENTS_RANGE: RangeInclusive<u32> = 0..=100;

/// Range of the `shares` counter.
pub const SHARES_RANGE: RangeInclusive<u32> = 0..=500;

/// Engagement counters of a single post, drawn independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engagement {
    pub likes: u32,
    pub comments: u32,
    pub shares: u32,
}

/// Draw an integer uniformly from the given inclusive range.
pub fn generate_counter<R: Rng>(rng: &mut R, range: RangeInclusive<u32>) -> u32 {
    rng.gen_range(range)
}

/// Draw likes, comments and shares uniformly from their ranges.
pub fn generate_engagement<R: Rng>(rng: &mut R) -> Engagement {
    Engagement {
        likes: generate_counter(rng, LIKES_RANGE),
        comments: generate_counter(rng, COMMENTS_RANGE),
        shares: generate_counter(rng, SHARES_RANGE),
    }
}
