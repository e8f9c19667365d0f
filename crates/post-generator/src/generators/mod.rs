//! Value generators for the individual fields of a post.
//!
//! Each generator takes the RNG explicitly so the caller decides whether the
//! output is reproducible (seeded) or not (entropy).

pub mod numeric;
pub mod text;
pub mod timestamp;
