//! Seeded pseudo-random stream shared by every gather resolution.
//!
//! The generator is a 32-bit linear congruential recurrence
//! (`state = state * 1664525 + 1013904223 mod 2^32`). It is deliberately
//! tiny: two engines on different platforms must agree on every draw, so
//! all arithmetic is exact `u32` wrapping math and the only float step is
//! the final `state / 2^32` division, which is exact in `f64`.
//!
//! # Seeding
//!
//! The integer seed is rendered as its decimal string and folded with a
//! rolling hash (`hash = hash * 31 + byte`). A zero hash is forced to 1.

use serde::{Deserialize, Serialize};

/// LCG multiplier.
const MULTIPLIER: u32 = 1_664_525;

/// LCG increment.
const INCREMENT: u32 = 1_013_904_223;

/// `2^32` as a float, the divisor that maps a state word into `[0, 1)`.
const STATE_SPAN: f64 = 4_294_967_296.0;

/// Fold the decimal string of `seed` into a non-zero 32-bit state.
pub fn hash_seed(seed: i64) -> u32 {
    let hash = seed
        .to_string()
        .bytes()
        .fold(0_u32, |acc, byte| acc.wrapping_mul(31).wrapping_add(u32::from(byte)));
    if hash == 0 { 1 } else { hash }
}

/// Deterministic random stream.
///
/// Identical seeds produce identical infinite sequences. The stream is a
/// pure function of its own prior state; nothing external feeds into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    /// The seed this stream was last (re)seeded with.
    seed: i64,
    /// State immediately after seeding, restored by [`SeededRng::reset`].
    initial: u32,
    /// Current state word.
    state: u32,
}

impl SeededRng {
    /// Create a stream seeded from `seed`.
    pub fn new(seed: i64) -> Self {
        let initial = hash_seed(seed);
        Self {
            seed,
            initial,
            state: initial,
        }
    }

    /// Reseed, discarding all prior draws.
    pub fn set_seed(&mut self, seed: i64) {
        *self = Self::new(seed);
    }

    /// Rewind to the state immediately after the last seeding.
    pub const fn reset(&mut self) {
        self.state = self.initial;
    }

    /// The seed this stream was last seeded with.
    pub const fn seed(&self) -> i64 {
        self.seed
    }

    /// Current raw state word.
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// Raw state word right after seeding.
    pub const fn initial_state(&self) -> u32 {
        self.initial
    }

    /// Advance the recurrence once and return the new state word.
    const fn advance(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }

    /// Next sample in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.advance()) / STATE_SPAN
    }

    /// Uniform integer in `[min, max]`, inclusive. Always consumes exactly
    /// one draw; a reversed range yields `min`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        let span = max.saturating_sub(min).saturating_add(1).max(1);
        let offset = (self.next_f64() * span as f64).floor() as i64;
        min.saturating_add(offset.min(span.saturating_sub(1)))
    }

    /// Pick one element uniformly. An empty slice returns `None` without
    /// drawing.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.next_f64() * items.len() as f64).floor() as usize;
        items.get(index.min(items.len().saturating_sub(1)))
    }

    /// In-place Fisher-Yates shuffle, walking from the back. Draws once per
    /// position `i >= 1`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let bound = i.saturating_add(1);
            let j = (self.next_f64() * bound as f64).floor() as usize;
            items.swap(i, j.min(i));
        }
    }
}

impl rand::RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.advance());
        let hi = u64::from(self.advance());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.advance().to_le_bytes();
            let len = chunk.len();
            if let Some(src) = bytes.get(..len) {
                chunk.copy_from_slice(src);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use rand::{Rng, RngCore};

    use super::*;

    #[test]
    fn seed_hash_matches_rolling_fold() {
        // "12345" -> ((((49*31+50)*31+51)*31+52)*31+53)
        assert_eq!(hash_seed(12_345), 46_792_755);
        // '-' (45) then '7' (55)
        assert_eq!(hash_seed(-7), 45 * 31 + 55);
        assert_eq!(hash_seed(0), 48);
    }

    #[test]
    fn known_sequence_for_seed_12345() {
        let mut rng = SeededRng::new(12_345);
        assert_eq!(rng.initial_state(), 46_792_755);
        let expected: [u32; 5] = [3_787_474_934, 1_457_823_453, 1_089_213_080, 1_756_132_631, 3_004_632_970];
        for word in expected {
            let sample = rng.next_f64();
            assert_eq!(rng.state(), word);
            assert_eq!(sample, f64::from(word) / 4_294_967_296.0);
        }
    }

    #[test]
    fn samples_stay_in_unit_interval() {
        let mut rng = SeededRng::new(99);
        for _ in 0..10_000 {
            let s = rng.next_f64();
            assert!((0.0..1.0).contains(&s));
        }
    }

    #[test]
    fn identical_seeds_identical_streams() {
        let mut a = SeededRng::new(424_242);
        let mut b = SeededRng::new(424_242);
        for _ in 0..1_000 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn reset_rewinds_to_post_seed_state() {
        let mut rng = SeededRng::new(7);
        let first: Vec<f64> = (0..5).map(|_| rng.next_f64()).collect();
        rng.reset();
        let again: Vec<f64> = (0..5).map(|_| rng.next_f64()).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn set_seed_ignores_prior_draws() {
        let mut used = SeededRng::new(1);
        for _ in 0..17 {
            used.next_f64();
        }
        used.set_seed(2);
        let mut fresh = SeededRng::new(2);
        assert_eq!(used, fresh);
        assert_eq!(used.next_f64(), fresh.next_f64());
    }

    #[test]
    fn random_int_is_inclusive_and_bounded() {
        let mut rng = SeededRng::new(5);
        let mut seen = [false; 6];
        for _ in 0..2_000 {
            let v = rng.random_int(1, 6);
            assert!((1..=6).contains(&v));
            seen[usize::try_from(v - 1).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn random_int_first_draw_for_seed_12345() {
        // First sample 0.8818... * 6 = 5.29 -> offset 5.
        let mut rng = SeededRng::new(12_345);
        assert_eq!(rng.random_int(1, 6), 6);
    }

    #[test]
    fn random_int_degenerate_ranges_still_draw_once() {
        let mut rng = SeededRng::new(3);
        assert_eq!(rng.random_int(4, 4), 4);
        assert_eq!(rng.random_int(9, 2), 9);
        let mut reference = SeededRng::new(3);
        reference.next_f64();
        reference.next_f64();
        assert_eq!(rng.state(), reference.state());
    }

    #[test]
    fn choice_on_empty_slice_does_not_draw() {
        let mut rng = SeededRng::new(11);
        let empty: [u8; 0] = [];
        assert!(rng.choice(&empty).is_none());
        assert_eq!(rng.state(), rng.initial_state());
        let items = ["a", "b", "c"];
        assert!(items.contains(rng.choice(&items).unwrap()));
    }

    #[test]
    fn shuffle_is_a_permutation_and_deterministic() {
        let mut a = SeededRng::new(2024);
        let mut b = SeededRng::new(2024);
        let mut left: Vec<u32> = (0..32).collect();
        let mut right = left.clone();
        a.shuffle(&mut left);
        b.shuffle(&mut right);
        assert_eq!(left, right);
        let mut sorted = left.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<u32>>());
        assert_ne!(left, sorted);
    }

    #[test]
    fn rng_core_interop_is_deterministic() {
        let mut a = SeededRng::new(77);
        let mut b = SeededRng::new(77);
        let xs: Vec<u32> = (0..16).map(|_| a.random_range(0..100)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.random_range(0..100)).collect();
        assert_eq!(xs, ys);

        let mut c = SeededRng::new(77);
        let mut buf = [0_u8; 6];
        c.fill_bytes(&mut buf);
        let mut d = SeededRng::new(77);
        let w0 = d.next_u32().to_le_bytes();
        let w1 = d.next_u32().to_le_bytes();
        assert_eq!(&buf[..4], &w0);
        assert_eq!(&buf[4..], &w1[..2]);
    }
}
