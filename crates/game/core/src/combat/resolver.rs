//! Multi-shot weapon attacks.

use tracing::debug;

use super::{AttackReport, CombatContext, OpposedRoll, ShotOutcome, WeaponStats, opposed_roll};
use crate::events::EventPayload;
use crate::state::OwnerId;
use crate::stats::tags;
use crate::world::{World, WorldError};

impl World {
    /// Rolls one opposed roll with the world's roll source.
    pub fn opposed_roll(
        &mut self,
        accuracy: f64,
        evasion: f64,
        crit_multiplier: f64,
    ) -> OpposedRoll {
        opposed_roll(self.rng.as_mut(), accuracy, evasion, crit_multiplier)
    }

    /// Resolves an attack of `weapon.shots` independent shots.
    ///
    /// Per shot: accuracy passes through the attacker's `accuracy` modifiers
    /// and the crit multiplier through `precision`; evasion is the defender's
    /// raw value. A hit takes its damage from the attacker's `damage`
    /// modifiers, multiplied on a crit, and fires `hit` (and `crit`) on the
    /// attacker. After the last shot the summed damage passes through
    /// `total_damage` and lands once through [`injure`](Self::injure), even
    /// when every shot missed.
    ///
    /// Whether either side is alive is the caller's concern.
    pub fn weapon_attack(
        &mut self,
        attacker: OwnerId,
        weapon: &WeaponStats,
        defender: OwnerId,
    ) -> Result<AttackReport, WorldError> {
        if !self.owners.contains_key(&attacker) {
            return Err(WorldError::UnknownOwner(attacker));
        }
        if !self.owners.contains_key(&defender) {
            return Err(WorldError::UnknownOwner(defender));
        }

        let mut ctx = CombatContext::new(attacker, defender, weapon.clone());
        for index in 0..weapon.shots {
            let accuracy = self.check(attacker, weapon.accuracy, tags::ACCURACY, false);
            let crit_mult = self.check(attacker, weapon.crit_mult, tags::PRECISION, false);
            let evasion = self
                .combatant(defender)
                .map(|c| c.evasion)
                .unwrap_or_default();
            let roll = self.opposed_roll(accuracy, evasion, crit_mult);

            let mut shot = ShotOutcome {
                index,
                roll,
                is_hit: roll.is_hit,
                is_crit: roll.landed_crit(),
                damage: 0.0,
            };
            if !shot.is_hit {
                debug!(%attacker, %defender, index, hit = roll.hit, dodge = roll.dodge, "shot missed");
                ctx.shots.push(shot);
                continue;
            }

            let mut damage = self.check(attacker, weapon.damage, tags::DAMAGE, false);
            if shot.is_crit {
                damage *= crit_mult;
            }
            shot.damage = damage;
            ctx.shot_damage = damage;
            ctx.total_damage += damage;
            ctx.shots.push(shot.clone());
            debug!(%attacker, %defender, index, crit = shot.is_crit, damage, "shot hit");

            self.trigger(
                attacker,
                "hit",
                Some(attacker),
                Some(defender),
                EventPayload::Combat(ctx.clone()),
            );
            if shot.is_crit {
                self.trigger(
                    attacker,
                    "crit",
                    Some(attacker),
                    Some(defender),
                    EventPayload::Combat(ctx.clone()),
                );
            }
        }

        let total = self.check(attacker, ctx.total_damage, tags::TOTAL_DAMAGE, false);
        let injury = self
            .injure(defender, total, Some(attacker), Some(&weapon.element))
            .ok_or(WorldError::UnknownOwner(defender))?;
        Ok(AttackReport {
            shots: ctx.shots,
            total,
            injury,
        })
    }
}
