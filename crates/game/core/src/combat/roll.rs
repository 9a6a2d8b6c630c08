//! Opposed hit/dodge rolls.

use crate::env::RollSource;

/// Result of one opposed roll.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpposedRoll {
    pub hit: f64,
    pub dodge: f64,
    pub is_hit: bool,
    /// Computed for every roll; only meaningful when `is_hit` is true.
    pub is_crit: bool,
}

impl OpposedRoll {
    /// Returns true if the roll hit and crit.
    pub fn landed_crit(&self) -> bool {
        self.is_hit && self.is_crit
    }
}

/// Rolls attacker accuracy against defender evasion.
///
/// # Formula
///
/// ```text
/// hit   = U(0,100) + accuracy × U(0,1)
/// dodge = U(0,100) + evasion  × U(0,1)
/// is_hit  = hit > dodge
/// is_crit = hit > dodge × crit_multiplier
/// ```
///
/// Samples are drawn in that order, four per roll.
pub fn opposed_roll(
    rng: &mut (impl RollSource + ?Sized),
    accuracy: f64,
    evasion: f64,
    crit_multiplier: f64,
) -> OpposedRoll {
    let hit = rng.uniform(0.0, 100.0) + accuracy * rng.next_f64();
    let dodge = rng.uniform(0.0, 100.0) + evasion * rng.next_f64();
    OpposedRoll {
        hit,
        dodge,
        is_hit: hit > dodge,
        is_crit: hit > dodge * crit_multiplier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, SequenceRng};

    #[test]
    fn draws_hit_then_dodge() {
        let mut rng = SequenceRng::new([0.5, 1.0, 0.25, 0.0]);
        let roll = opposed_roll(&mut rng, 20.0, 40.0, 1.5);
        assert_eq!(roll.hit, 70.0);
        assert_eq!(roll.dodge, 25.0);
        assert!(roll.is_hit);
        assert!(roll.is_crit);
        assert!(roll.landed_crit());
    }

    #[test]
    fn crit_without_hit_does_not_land() {
        let mut rng = SequenceRng::new([0.1, 0.0, 0.2, 0.0]);
        let roll = opposed_roll(&mut rng, 0.0, 0.0, 0.1);
        assert!(!roll.is_hit);
        assert!(roll.is_crit);
        assert!(!roll.landed_crit());
    }

    #[test]
    fn even_bonuses_hit_about_half_the_time() {
        let mut rng = PcgRng::seeded(0xC0FFEE);
        let trials = 100_000;
        let hits = (0..trials)
            .filter(|_| opposed_roll(&mut rng, 0.0, 0.0, 2.0).is_hit)
            .count();
        let rate = hits as f64 / trials as f64;
        assert!((rate - 0.5).abs() < 0.01, "hit rate {rate}");
    }
}
