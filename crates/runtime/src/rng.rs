//! Production roll source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use effect_core::RollSource;

/// [`RollSource`] backed by [`StdRng`].
///
/// Seed it for reproducible sessions; [`GameRng::from_entropy`] for live play.
#[derive(Clone, Debug)]
pub struct GameRng {
    rng: StdRng,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RollSource for GameRng {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rolls_repeat() {
        let mut a = GameRng::seeded(42);
        let mut b = GameRng::seeded(42);
        for _ in 0..32 {
            let roll = a.uniform(0.0, 100.0);
            assert!((0.0..100.0).contains(&roll));
            assert_eq!(roll, b.uniform(0.0, 100.0));
        }
    }
}
