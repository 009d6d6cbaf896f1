#[cfg(test)]
#[path = "../../tests/unit/utils/random_test.rs"]
mod random_test;

use crate::utils::{Float, compare_floats};
use rand::prelude::*;
use rand::rngs::SmallRng;
use std::sync::Mutex;

/// Provides the way to use randomized values in generic way.
pub trait Random {
    /// Produces integral random value, uniformly distributed on the closed interval [min, max]
    fn uniform_int(&self, min: i32, max: i32) -> i32;

    /// Produces real random value, uniformly distributed on the closed interval [min, max)
    fn uniform_real(&self, min: Float, max: Float) -> Float;

    /// Flips a coin and returns true if it is "heads", false otherwise.
    fn is_head_not_tails(&self) -> bool;

    /// Tests probability value in (0., 1.) range.
    fn is_hit(&self, probability: Float) -> bool;

    /// Returns an index from collected with probability weight.
    /// Uses exponential distribution where the weights are the rate of the distribution (lambda)
    /// and selects the smallest sampled value.
    fn weighted(&self, weights: &[usize]) -> usize;

    /// Returns a new seed which can be used to create an independent random generator.
    fn next_seed(&self) -> u64;
}

/// A default random implementation backed by a small fast generator.
pub struct DefaultRandom {
    rng: Mutex<SmallRng>,
}

impl DefaultRandom {
    /// Creates a new instance of `DefaultRandom` seeded from system entropy.
    pub fn new() -> Self {
        Self { rng: Mutex::new(SmallRng::from_entropy()) }
    }

    /// Creates a new instance of `DefaultRandom` which produces the same sequence for the same seed.
    pub fn new_repeatable(seed: u64) -> Self {
        Self { rng: Mutex::new(SmallRng::seed_from_u64(seed)) }
    }

    fn with_rng<R>(&self, action: impl FnOnce(&mut SmallRng) -> R) -> R {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        action(&mut rng)
    }
}

impl Default for DefaultRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl Random for DefaultRandom {
    fn uniform_int(&self, min: i32, max: i32) -> i32 {
        if min == max {
            return min;
        }

        assert!(min < max);
        self.with_rng(|rng| rng.gen_range(min..=max))
    }

    fn uniform_real(&self, min: Float, max: Float) -> Float {
        if (min - max).abs() < Float::EPSILON {
            return min;
        }

        assert!(min < max);
        self.with_rng(|rng| rng.gen_range(min..max))
    }

    fn is_head_not_tails(&self) -> bool {
        self.with_rng(|rng| rng.gen_bool(0.5))
    }

    fn is_hit(&self, probability: Float) -> bool {
        self.with_rng(|rng| rng.gen_bool(probability.clamp(0., 1.)))
    }

    fn weighted(&self, weights: &[usize]) -> usize {
        weights
            .iter()
            .zip(0_usize..)
            .filter(|(weight, _)| **weight > 0)
            .map(|(&weight, index)| (-self.uniform_real(0., 1.).ln() / weight as Float, index))
            .min_by(|a, b| compare_floats(a.0, b.0))
            .map_or(0, |(_, index)| index)
    }

    fn next_seed(&self) -> u64 {
        self.with_rng(|rng| rng.next_u64())
    }
}

/// Shuffles items using given random source with Fisher-Yates algorithm.
pub fn shuffle_with<T>(items: &mut [T], random: &(dyn Random + Send + Sync)) {
    for idx in (1..items.len()).rev() {
        let other = random.uniform_int(0, idx as i32) as usize;
        items.swap(idx, other);
    }
}

/// Creates a generator which is deterministic for the given seed and stream index.
pub fn create_stream_rng(seed: u64, stream: u64) -> SmallRng {
    // NOTE mixing constant is the 64-bit golden ratio used by splitmix
    SmallRng::seed_from_u64(seed ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
