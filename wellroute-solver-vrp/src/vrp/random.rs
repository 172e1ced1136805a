//! Seedable random source handed to the search.

use std::sync::{Mutex, PoisonError};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use vrp_core::rosomaxa::prelude::{Random, RandomGen};

/// [`Random`] drawing every value from one `ChaCha8` stream.
///
/// Two searches built from the same seed make the same choices, provided the
/// solver runs on a single thread.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<ChaCha8Rng>,
}

impl SeededRandom {
    /// Start a stream at `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn draw<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

impl Random for SeededRandom {
    fn uniform_int(&self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.draw(|rng| rng.gen_range(min..=max))
    }

    fn uniform_real(&self, min: f64, max: f64) -> f64 {
        if min.partial_cmp(&max) != Some(std::cmp::Ordering::Less) {
            return min;
        }
        self.draw(|rng| rng.gen_range(min..max))
    }

    fn is_head_not_tails(&self) -> bool {
        self.draw(|rng| rng.gen_bool(0.5))
    }

    fn is_hit(&self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.draw(|rng| rng.gen_bool(probability.clamp(0.0, 1.0)))
    }

    fn weighted(&self, weights: &[usize]) -> usize {
        let total = weights.iter().fold(0_usize, |sum, &w| sum.saturating_add(w));
        if total == 0 {
            return 0;
        }
        let mut ticket = self.draw(|rng| rng.gen_range(0..total));
        for (index, &weight) in weights.iter().enumerate() {
            if ticket < weight {
                return index;
            }
            ticket = ticket.saturating_sub(weight);
        }
        weights.len().saturating_sub(1)
    }

    fn get_rng(&self) -> RandomGen {
        RandomGen::new_repeatable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draws(random: &SeededRandom) -> Vec<i32> {
        (0..16).map(|_| random.uniform_int(0, 1_000)).collect()
    }

    #[rstest]
    fn same_seed_same_stream() {
        assert_eq!(draws(&SeededRandom::new(11)), draws(&SeededRandom::new(11)));
        assert_ne!(draws(&SeededRandom::new(11)), draws(&SeededRandom::new(12)));
    }

    #[rstest]
    fn degenerate_ranges_return_the_lower_end() {
        let random = SeededRandom::new(0);
        assert_eq!(random.uniform_int(4, 4), 4);
        assert_eq!(random.uniform_real(2.5, 2.5).to_bits(), 2.5_f64.to_bits());
    }

    #[rstest]
    #[case(&[0, 5, 0], 1)]
    #[case(&[0, 0, 3], 2)]
    #[case(&[0, 0], 0)]
    fn weighted_skips_zero_weights(#[case] weights: &[usize], #[case] expected: usize) {
        let random = SeededRandom::new(5);
        for _ in 0..8 {
            assert_eq!(random.weighted(weights), expected);
        }
    }

    #[rstest]
    fn hit_probability_is_clamped() {
        let random = SeededRandom::new(3);
        assert!(random.is_hit(2.0));
        assert!(!random.is_hit(-1.0));
        assert!(!random.is_hit(f64::NAN));
    }
}
