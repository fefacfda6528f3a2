//! Random number generation for dungeon generation
//!
//! Uses a seeded ChaCha RNG for reproducibility. Every floor captures one seed and
//! rebuilds independent `DungeonRng` instances from it, so separate drawing passes
//! replay the same choices.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use uuid::Uuid;

use crate::dungeon::Bound;

/// Dungeon random number generator
///
/// Wraps ChaCha8Rng for reproducible random number generation.
#[derive(Debug, Clone)]
pub struct DungeonRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl DungeonRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw a fresh seed for a child RNG
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Returns a value in `lo..=hi`
    ///
    /// `hi` is clamped up to `lo`, so an empty range yields `lo`.
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Returns a value inside an inclusive bound
    pub fn between(&mut self, bound: Bound) -> i32 {
        self.range_inclusive(bound.lower, bound.upper)
    }

    /// Returns a float in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Returns a float in `[lo, hi)`
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    /// Returns true with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Sample a normal distribution
    ///
    /// Returns `mean` without drawing when `std` is not a positive finite
    /// deviation.
    pub fn gauss(&mut self, mean: f64, std: f64) -> f64 {
        if !std.is_finite() || std <= 0.0 {
            return mean;
        }
        match Normal::new(mean, std) {
            Ok(normal) => normal.sample(&mut self.rng),
            Err(_) => mean,
        }
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rng.gen_range(0..items.len())])
        }
    }

    /// Build a version 4 uuid from this RNG's stream
    pub fn uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

impl Default for DungeonRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RngCore for DungeonRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
