//! Alive/Dead transitions.
//!
//! ```text
//! Alive ──(hp ≤ 0)──► Dead ──(revive timer)──► Alive
//! ```

use tracing::info;

use crate::effect::RemoveCause;
use crate::events::EventPayload;
use crate::schedule::TimerPayload;
use crate::state::{LifeState, OwnerId};
use crate::world::World;

impl World {
    /// Moves `victim` from alive to dead.
    ///
    /// Clears every combat effect not marked to survive death, schedules the
    /// revive timer and publishes `death`. Returns false (and does nothing)
    /// if the victim is unknown or already dead.
    pub fn die(&mut self, victim: OwnerId, killer: Option<OwnerId>) -> bool {
        let Some(combatant) = self.combatant_mut(victim) else {
            return false;
        };
        if combatant.is_dead() {
            return false;
        }
        combatant.life = LifeState::Dead;
        combatant.deaths += 1;
        let death = combatant.deaths;
        let name = combatant.name.clone();
        info!(%victim, killer = ?killer, death, "combatant died");

        let catalog = &self.catalog;
        let cleared = self
            .owners
            .get(&victim)
            .map(|owner| {
                owner.effects.keys_where(|instance| {
                    catalog
                        .definition(&instance.definition)
                        .is_some_and(|definition| definition.clears_on_death())
                })
            })
            .unwrap_or_default();
        for key in cleared {
            self.remove_effect(victim, &key, RemoveCause::Manual, false);
        }

        let delay = self.config.revive_delay;
        self.scheduler.schedule(
            delay,
            TimerPayload::Revive {
                owner: victim,
                death,
            },
            true,
        );

        self.publish(
            "death",
            Some(victim),
            EventPayload::Death { victim, killer },
            ["death"],
        );
        self.sink.message(victim, "You have died.");
        self.sink
            .broadcast(victim, &format!("{name} has died."), &[victim]);
        true
    }

    /// Moves `owner` from dead back to alive at full health.
    ///
    /// Returns false if the owner is unknown or not dead. A pending revive
    /// timer for the death it ends becomes a no-op.
    pub fn revive(&mut self, owner: OwnerId) -> bool {
        let Some(combatant) = self.combatant_mut(owner) else {
            return false;
        };
        if !combatant.is_dead() {
            return false;
        }
        combatant.life = LifeState::Alive;
        combatant.hp = combatant.max_hp;
        let name = combatant.name.clone();
        info!(%owner, "combatant revived");

        self.publish(
            "revive",
            Some(owner),
            EventPayload::Revive { owner },
            ["revive"],
        );
        self.sink.message(owner, "You feel life return to your body.");
        self.sink
            .broadcast(owner, &format!("{name} returns to life."), &[owner]);
        true
    }
}
