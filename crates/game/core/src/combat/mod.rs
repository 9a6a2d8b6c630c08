//! Combat resolution.
//!
//! An attack resolves as independent opposed rolls, one per shot, with stat
//! queries feeding accuracy, crit multiplier and damage. Landed damage is
//! summed and applied once through [`World::injure`](crate::World::injure),
//! which owns mitigation and the alive/dead transition.
//!
//! ```text
//! weapon_attack ─► per shot: check(accuracy, precision) ─► opposed_roll
//!                     └─ hit: check(damage) × crit ─► trigger(hit, crit)
//!               ─► check(total_damage) ─► injure ─► publish(injury)
//!                                                   └─ hp ≤ 0: die ─► revive timer
//! ```

mod damage;
mod lifecycle;
mod resolver;
mod result;
mod roll;
mod weapon;

pub use damage::InjuryReport;
pub use result::{AttackReport, CombatContext, ShotOutcome};
pub use roll::{OpposedRoll, opposed_roll};
pub use weapon::WeaponStats;
