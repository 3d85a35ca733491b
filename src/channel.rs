//! Deterministic bit-flip injection for tests and demos.
//!
//! Not part of the codec's contract: a small helper for exercising the
//! decoder against a reproducible noisy channel, grounded on the
//! `rand.rs` `Rng` alias and the random-position idiom in
//! `simulation::ber::BerTest::random_message`.

use rand::seq::index;
use rand::RngCore;

/// Flips exactly `num_flips` distinct, uniformly chosen bit positions of
/// `word` in place.
///
/// # Panics
/// Panics if `num_flips > word.len()`, mirroring `rand::seq::index::sample`.
pub fn flip_bits<R: RngCore>(word: &mut [u8], num_flips: usize, rng: &mut R) {
    for i in index::sample(rng, word.len(), num_flips).into_iter() {
        word[i] ^= 1;
    }
}
