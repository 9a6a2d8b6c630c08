//! Stat queries over active effects.
//!
//! A stat is identified by a free-form tag. Effects contribute to a query
//! through the [`Modifier`](crate::Modifier)s their definition declares for
//! that tag; [`World::check`](crate::World::check) gathers them and
//! [`ModifierTotals`] folds them into the final value.

mod bonus;
mod query;

pub use bonus::ModifierTotals;

/// Stat tags queried by the combat resolver.
pub mod tags {
    /// Attacker accuracy, per shot.
    pub const ACCURACY: &str = "accuracy";
    /// Attacker crit multiplier, per shot.
    pub const PRECISION: &str = "precision";
    /// Attacker per-shot damage.
    pub const DAMAGE: &str = "damage";
    /// Attacker damage summed over every shot of an attack.
    pub const TOTAL_DAMAGE: &str = "total_damage";
    /// Defender mitigation of incoming damage.
    pub const INJURY: &str = "injury";
}
