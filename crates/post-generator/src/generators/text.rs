//! Fake user names and post bodies.

use fake::faker::internet::en::Username;
use fake::faker::lorem::en::Paragraph;
use fake::Fake;
use rand::Rng;
use std::ops::Range;

/// Number of sentences in a generated post body.
const SENTENCES_PER_POST: Range<usize> = 1..4;

/// Generate a fake user name such as `jdoe42`.
pub fn generate_username<R: Rng>(rng: &mut R) -> String {
    Username().fake_with_rng(rng)
}

/// Generate a short paragraph of filler text for the post body.
pub fn generate_post_content<R: Rng>(rng: &mut R) -> String {
    Paragraph(SENTENCES_PER_POST).fake_with_rng(rng)
}
