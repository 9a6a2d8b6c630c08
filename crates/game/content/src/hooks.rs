//! Stock hook implementations that content files can bind by id.

use std::sync::Arc;

use effect_core::{EffectHooks, EffectInstance, EventPayload, HookTable, TriggerContext, World};
use tracing::trace;

/// Hook id for [`Regeneration`].
pub const REGENERATION: &str = "regeneration";
/// Hook id for [`Announce`].
pub const ANNOUNCE: &str = "announce";
/// Hook id for [`Retaliate`].
pub const RETALIATE: &str = "retaliate";

/// Heals the owner by `per_stack` hit points per stack on every tick.
///
/// Healing never exceeds the owner's maximum and skips dead owners.
#[derive(Clone, Copy, Debug)]
pub struct Regeneration {
    pub per_stack: i32,
}

impl EffectHooks for Regeneration {
    fn on_tick(&self, world: &mut World, effect: &EffectInstance) {
        let Some(combatant) = world.combatant_mut(effect.owner) else {
            return;
        };
        if !combatant.is_alive() {
            return;
        }
        let heal = self.per_stack.saturating_mul(effect.stacks as i32);
        combatant.hp = combatant.hp.saturating_add(heal).min(combatant.max_hp);
        trace!(owner = %effect.owner, heal, hp = combatant.hp, "regenerated");
    }
}

/// Tells the owner when the effect starts and when it wears off.
#[derive(Clone, Copy, Debug, Default)]
pub struct Announce;

impl Announce {
    fn name(world: &World, effect: &EffectInstance) -> String {
        world
            .catalog()
            .definition(&effect.definition)
            .map(|definition| definition.name.clone())
            .unwrap_or_else(|| effect.definition.clone())
    }
}

impl EffectHooks for Announce {
    fn on_apply(&self, world: &mut World, effect: &EffectInstance) {
        let text = format!("You are affected by {}.", Self::name(world, effect));
        world.message(effect.owner, &text);
    }

    fn on_expire(&self, world: &mut World, effect: &EffectInstance) {
        let text = format!("{} wears off.", Self::name(world, effect));
        world.message(effect.owner, &text);
    }
}

/// Strikes back at whoever injured the owner for `damage` per stack.
///
/// Listens for injury triggers on its owner. Its own injuries carry
/// `element` and are never answered, so two retaliating owners stop after
/// one exchange.
#[derive(Clone, Debug)]
pub struct Retaliate {
    pub damage: f64,
    pub element: String,
}

impl EffectHooks for Retaliate {
    fn on_trigger(&self, world: &mut World, ctx: &TriggerContext) {
        let EventPayload::Injury(report) = &ctx.payload else {
            return;
        };
        if report.defender != ctx.effect.owner
            || report.element == self.element
            || report.taken <= 0
        {
            return;
        }
        let Some(attacker) = report.attacker else {
            return;
        };
        let raw = self.damage * f64::from(ctx.effect.stacks);
        world.injure(attacker, raw, Some(ctx.effect.owner), Some(&self.element));
    }
}

/// Hook table with every stock hook bound to its id.
pub fn standard_hooks() -> HookTable {
    let mut table = HookTable::new();
    table.insert(REGENERATION, Arc::new(Regeneration { per_stack: 1 }));
    table.insert(ANNOUNCE, Arc::new(Announce));
    table.insert(
        RETALIATE,
        Arc::new(Retaliate {
            damage: 2.0,
            element: "retaliation".to_owned(),
        }),
    );
    table
}
