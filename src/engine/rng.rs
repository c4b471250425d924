//! # engine::rng
//!
//! Every random draw in the simulator goes through [`RandomSource`], so tests
//! can swap the thread RNG for a seeded or fully scripted sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws in `[0, 1)`.
///
/// The helper methods are defined on top of [`RandomSource::next_f64`] so a
/// scripted source fully controls every derived value.
pub trait RandomSource: Send {
    /// Uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[lo, hi]`.
    fn int_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        let span = (hi - lo + 1) as f64;
        lo + ((self.next_f64() * span).floor() as u32).min(hi - lo)
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64).floor() as usize).min(len - 1)
    }

    /// Uniform float in `[lo, hi)`.
    fn float_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

/// Production source backed by `rand::thread_rng()`.
///
/// `ThreadRng` itself is not `Send`, so it is fetched per draw.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic source for reproducible runs.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(draws: &[f64]) -> Self {
        assert!(!draws.is_empty(), "scripted source needs at least one draw");
        Self {
            draws: draws.to_vec(),
            cursor: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        let v = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        v
    }
}
