//! Roll sources for combat randomness.
//!
//! Combat draws uniform samples through the [`RollSource`] trait so a world can
//! run on a seeded, reproducible generator in tests and replays and on any
//! other generator in production.
//!
//! # Determinism
//!
//! [`PcgRng`] is deterministic: the same seed always yields the same sequence.

use std::collections::VecDeque;

/// Source of uniform random samples.
pub trait RollSource: Send {
    /// Next sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform sample in `[min, max)`.
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// This implementation uses PCG-XSH-RR, which produces 32-bit output from
/// 64-bit state.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator whose first output depends only on `seed`.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.state = Self::pcg_step(rng.state.wrapping_add(seed));
        rng
    }

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Generates the next 32-bit output and advances the stream.
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }
}

impl Default for PcgRng {
    fn default() -> Self {
        Self::seeded(0)
    }
}

impl RollSource for PcgRng {
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Replays a fixed list of samples, then repeats the last one.
///
/// Used to script exact roll outcomes when replaying a recorded fight.
#[derive(Clone, Debug, Default)]
pub struct SequenceRng {
    samples: VecDeque<f64>,
    last: f64,
}

impl SequenceRng {
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            last: 0.0,
        }
    }

    /// Samples not yet consumed.
    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl RollSource for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        if let Some(sample) = self.samples.pop_front() {
            self.last = sample;
        }
        self.last
    }
}
