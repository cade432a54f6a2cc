//! Seeded random number generator.
//!
//! Uses the xorshift32 algorithm. Layouts and AI do not need to be
//! reproducible during play, but seeding makes every test and soak run
//! replayable from a single number.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

/// Seeded random number generator using the xorshift32 algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Creates a new RNG with the given seed.
    /// Seed of 0 is treated as 1 to avoid the all-zero fixed point.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1).
    pub fn next(&mut self) -> f32 {
        // 24 bits keeps the result strictly below 1.0 in f32
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max).
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next() * (max - min)
    }

    /// Returns a float in [-span/2, span/2).
    pub fn centered(&mut self, span: f32) -> f32 {
        (self.next() - 0.5) * span
    }

    /// Returns an angle in [0, 2π).
    pub fn angle(&mut self) -> f32 {
        self.next() * TAU
    }

    /// Returns true with the given probability.
    pub fn chance(&mut self, probability: f32) -> bool {
        self.next() < probability
    }

    /// Returns an index in [0, len). `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        ((self.next_u32() as u64 * len as u64) >> 32) as usize
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(1)
    }
}
