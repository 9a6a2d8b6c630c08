//! Attack bookkeeping and results.

use super::{InjuryReport, OpposedRoll, WeaponStats};
use crate::state::OwnerId;

/// Outcome of a single shot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShotOutcome {
    pub index: u32,
    pub roll: OpposedRoll,
    pub is_hit: bool,
    /// Crit that landed (gated by the hit).
    pub is_crit: bool,
    /// Damage of the shot before mitigation, zero on a miss.
    pub damage: f64,
}

/// Running state of an attack, carried as the payload of `hit` and `crit`
/// triggers.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatContext {
    pub attacker: OwnerId,
    pub defender: OwnerId,
    pub weapon: WeaponStats,
    pub shots: Vec<ShotOutcome>,
    /// Damage of the most recent landed shot.
    pub shot_damage: f64,
    /// Sum of landed shot damage so far.
    pub total_damage: f64,
}

impl CombatContext {
    pub fn new(attacker: OwnerId, defender: OwnerId, weapon: WeaponStats) -> Self {
        Self {
            attacker,
            defender,
            weapon,
            shots: Vec::new(),
            shot_damage: 0.0,
            total_damage: 0.0,
        }
    }

    pub fn hits(&self) -> usize {
        self.shots.iter().filter(|s| s.is_hit).count()
    }
}

/// Result of [`World::weapon_attack`](crate::World::weapon_attack).
#[derive(Clone, Debug, PartialEq)]
pub struct AttackReport {
    pub shots: Vec<ShotOutcome>,
    /// Summed damage after `total_damage` modifiers.
    pub total: f64,
    /// Injury dealt to the defender.
    pub injury: InjuryReport,
}

impl AttackReport {
    pub fn hits(&self) -> usize {
        self.shots.iter().filter(|s| s.is_hit).count()
    }

    pub fn crits(&self) -> usize {
        self.shots.iter().filter(|s| s.is_crit).count()
    }

    pub fn killed(&self) -> bool {
        self.injury.killed
    }
}
