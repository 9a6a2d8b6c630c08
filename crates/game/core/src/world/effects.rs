//! Effect lifecycle on the world: apply, remove, sweep, pause, dispel.
//!
//! [`ModifierStore`](crate::ModifierStore) decides what a mutation does to the
//! data. This module wraps each mutation with the hooks and timers it implies:
//!
//! | Operation | Hooks                              | Timers                       |
//! |-----------|------------------------------------|------------------------------|
//! | apply     | `on_apply`, first `on_tick`        | expiry sweep, next tick      |
//! | remove    | `on_dispel`/`on_expire`, `on_remove` | none (stale ones no-op)    |
//! | unpause   | none                               | expiry sweep, restarted tick |

use tracing::{debug, trace, warn};

use super::{World, WorldError};
use crate::effect::{
    ApplyOptions, EffectDefinition, EffectInstance, EffectView, INFINITE_DURATION, RemoveCause,
};
use crate::schedule::TimerPayload;
use crate::state::OwnerId;

impl World {
    /// Applies the definition `definition` to `owner` on behalf of `source`.
    ///
    /// Sweeps expired instances first, then merges with an existing instance
    /// under the same key (stack, refresh or replace), calls `on_apply`,
    /// starts a tick chain for a new instance with an immediate first tick,
    /// and schedules the expiry sweep whenever the lifetime (re)starts.
    /// Returns a snapshot of the stored instance.
    pub fn apply_effect(
        &mut self,
        owner: OwnerId,
        definition: &str,
        source: OwnerId,
        options: ApplyOptions,
    ) -> Result<EffectInstance, WorldError> {
        let entry = self
            .catalog
            .get(definition)
            .cloned()
            .ok_or_else(|| WorldError::UnknownDefinition(definition.to_owned()))?;
        // An expired but unswept instance must not be merged into.
        self.cleanup(owner);
        let now = self.now();
        let store = &mut self
            .owners
            .get_mut(&owner)
            .ok_or(WorldError::UnknownOwner(owner))?
            .effects;
        let (kind, instance) =
            store.merge(&entry.definition, source, options, now, &mut self.generations);
        debug!(
            %owner,
            %source,
            key = %instance.key,
            %kind,
            stacks = instance.stacks,
            "applied effect"
        );

        entry.hooks.on_apply(self, &instance);

        if kind.is_new() && entry.definition.is_ticking() {
            self.run_tick(owner, &instance.key, instance.tick_generation);
        }
        if kind.restarts_lifetime() && !instance.is_infinite() {
            self.schedule_expiry(&instance);
        }
        Ok(instance)
    }

    /// Removes the instance under `key` from `owner`.
    ///
    /// The instance leaves the store before any hook runs, so a hook that
    /// removes it again finds nothing. Unless `quiet`, `on_dispel` or
    /// `on_expire` (matching `cause`) runs, then `on_remove`. Returns the
    /// removed instance, or `None` if nothing was stored under `key`.
    pub fn remove_effect(
        &mut self,
        owner: OwnerId,
        key: &str,
        cause: RemoveCause,
        quiet: bool,
    ) -> Option<EffectInstance> {
        let removed = self.owners.get_mut(&owner)?.effects.take(key)?;
        debug!(%owner, key, %cause, quiet, "removed effect");

        if !quiet {
            if let Some(hooks) = self.catalog.hooks(&removed.definition) {
                match cause {
                    RemoveCause::Dispel => hooks.on_dispel(self, &removed),
                    RemoveCause::Expire => hooks.on_expire(self, &removed),
                    RemoveCause::Manual => {}
                }
                hooks.on_remove(self, &removed);
            } else {
                warn!(%owner, definition = %removed.definition, "no hooks for removed effect");
            }
        }
        Some(removed)
    }

    /// Applies `definition` as a permanent perk granted by `slot` (an item or
    /// equipment slot acting as the source).
    ///
    /// Non-unique perks get one instance per slot, so the same perk granted by
    /// two items stays independent and is removed with its slot.
    pub fn apply_perk(
        &mut self,
        owner: OwnerId,
        definition: &str,
        slot: OwnerId,
    ) -> Result<EffectInstance, WorldError> {
        self.apply_effect(owner, definition, slot, ApplyOptions::duration(INFINITE_DURATION))
    }

    /// Removes every instance on `owner` whose lifetime has run out.
    ///
    /// Returns the removed instances in store order.
    pub fn cleanup(&mut self, owner: OwnerId) -> Vec<EffectInstance> {
        let now = self.now();
        let Some(entry) = self.owners.get(&owner) else {
            return Vec::new();
        };
        let expired = entry.effects.expired_keys(now);

        let mut removed = Vec::with_capacity(expired.len());
        for key in expired {
            // An earlier hook may have refreshed or removed it.
            let still_expired = self
                .owners
                .get(&owner)
                .and_then(|entry| entry.effects.get(&key))
                .is_some_and(|instance| instance.is_expired(now));
            if !still_expired {
                continue;
            }
            if let Some(instance) = self.remove_effect(owner, &key, RemoveCause::Expire, false) {
                removed.push(instance);
            }
        }
        removed
    }

    /// Freezes the remaining lifetime of the instance under `key`.
    ///
    /// Paused instances are excluded from stat checks and triggers, and their
    /// tick chain stops. No hooks run.
    pub fn pause_effect(&mut self, owner: OwnerId, key: &str) -> Option<EffectInstance> {
        let now = self.now();
        let paused = self.owners.get_mut(&owner)?.effects.pause(key, now)?;
        debug!(%owner, key, remaining = paused.duration, "paused effect");
        Some(paused)
    }

    /// Resumes a paused instance with its frozen remaining lifetime.
    ///
    /// Reschedules the expiry sweep and restarts the tick chain one tick
    /// interval out.
    pub fn unpause_effect(&mut self, owner: OwnerId, key: &str) -> Option<EffectInstance> {
        let now = self.now();
        let resumed = self
            .owners
            .get_mut(&owner)?
            .effects
            .unpause(key, now, &mut self.generations)?;
        debug!(%owner, key, remaining = resumed.duration, "unpaused effect");

        if !resumed.is_infinite() {
            self.schedule_expiry(&resumed);
        }
        let tick_rate = self
            .catalog
            .definition(&resumed.definition)
            .filter(|definition| definition.is_ticking())
            .map(|definition| definition.tick_rate);
        if let Some(tick_rate) = tick_rate {
            self.schedule_tick(&resumed, tick_rate);
        }
        Some(resumed)
    }

    /// Presentation listing of `owner`'s effects after an expiry sweep.
    pub fn view_effects(&mut self, owner: OwnerId) -> Vec<EffectView> {
        self.cleanup(owner);
        let now = self.now();
        let Some(entry) = self.owners.get(&owner) else {
            return Vec::new();
        };
        entry
            .effects
            .iter()
            .map(|instance| {
                let definition = self.catalog.definition(&instance.definition);
                EffectView {
                    key: instance.key.clone(),
                    name: definition
                        .map(|d| d.name.clone())
                        .unwrap_or_else(|| instance.definition.clone()),
                    flavor: definition.map(|d| d.flavor.clone()).unwrap_or_default(),
                    stacks: instance.stacks,
                    remaining: instance.remaining(now),
                    paused: instance.paused,
                }
            })
            .collect()
    }

    /// Removes every instance on `owner` matching `predicate`, calling
    /// `on_dispel` then `on_remove` for each.
    pub fn dispel(
        &mut self,
        owner: OwnerId,
        mut predicate: impl FnMut(&EffectDefinition, &EffectInstance) -> bool,
    ) -> Vec<EffectInstance> {
        let catalog = &self.catalog;
        let keys = match self.owners.get(&owner) {
            Some(entry) => entry.effects.keys_where(|instance| {
                catalog
                    .definition(&instance.definition)
                    .is_some_and(|definition| predicate(definition.as_ref(), instance))
            }),
            None => return Vec::new(),
        };
        keys.iter()
            .filter_map(|key| self.remove_effect(owner, key, RemoveCause::Dispel, false))
            .collect()
    }

    /// Runs one tick of the instance under `key` if `generation` is still its
    /// live chain, then schedules the next one.
    pub(crate) fn run_tick(&mut self, owner: OwnerId, key: &str, generation: u64) {
        let now = self.now();
        let Some(instance) = self
            .owners
            .get(&owner)
            .and_then(|entry| entry.effects.get(key))
            .filter(|instance| {
                instance.tick_generation == generation
                    && !instance.paused
                    && !instance.is_expired(now)
            })
            .cloned()
        else {
            trace!(%owner, key, generation, "dropped stale tick");
            return;
        };
        let Some(entry) = self.catalog.get(&instance.definition).cloned() else {
            return;
        };

        if let Some(owner_entry) = self.owners.get_mut(&owner) {
            owner_entry.effects.record_tick(key, now);
        }
        trace!(%owner, key, generation, "tick");
        entry.hooks.on_tick(self, &instance);

        // The hook may have removed, paused or replaced the instance.
        let live = self
            .owners
            .get(&owner)
            .and_then(|entry| entry.effects.get(key))
            .filter(|live| live.tick_generation == generation && !live.paused)
            .cloned();
        if let Some(live) = live {
            self.schedule_tick(&live, entry.definition.tick_rate);
        }
    }

    fn schedule_tick(&mut self, instance: &EffectInstance, tick_rate: f64) {
        self.scheduler.schedule(
            tick_rate,
            TimerPayload::Tick {
                owner: instance.owner,
                key: instance.key.clone(),
                generation: instance.tick_generation,
            },
            true,
        );
    }

    fn schedule_expiry(&mut self, instance: &EffectInstance) {
        let now = self.now();
        let remaining = instance.remaining(now).unwrap_or_default();
        self.scheduler.schedule(
            remaining + self.config.expiry_epsilon,
            TimerPayload::Expire {
                owner: instance.owner,
                key: instance.key.clone(),
            },
            true,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::effect::{EffectCatalog, EffectHooks, INFINITE_DURATION};
    use crate::state::Combatant;

    const HERO: OwnerId = OwnerId(1);

    #[derive(Default)]
    struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        fn log(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }
    }

    impl EffectHooks for Journal {
        fn on_apply(&self, _: &mut World, effect: &EffectInstance) {
            self.log(format!("apply:{}", effect.stacks));
        }

        fn on_remove(&self, _: &mut World, _: &EffectInstance) {
            self.log("remove".into());
        }

        fn on_dispel(&self, _: &mut World, _: &EffectInstance) {
            self.log("dispel".into());
        }

        fn on_expire(&self, _: &mut World, _: &EffectInstance) {
            self.log("expire".into());
        }
    }

    /// Removes its own instance from inside `on_remove`.
    struct Reentrant;

    impl EffectHooks for Reentrant {
        fn on_remove(&self, world: &mut World, effect: &EffectInstance) {
            assert!(
                world
                    .remove_effect(effect.owner, &effect.key, RemoveCause::Manual, false)
                    .is_none()
            );
        }
    }

    fn world_with(
        definition: EffectDefinition,
    ) -> (World, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut catalog = EffectCatalog::new();
        catalog
            .register_with(definition, Journal(Arc::clone(&log)))
            .unwrap();
        let mut world = World::new(catalog);
        world.spawn(HERO, Combatant::new("hero", 50)).unwrap();
        (world, log)
    }

    #[test]
    fn unknown_owner_and_definition_are_errors() {
        let (mut world, _) = world_with(EffectDefinition::new("ward", "Ward", 5.0));
        assert_eq!(
            world
                .apply_effect(OwnerId(7), "ward", HERO, ApplyOptions::default())
                .unwrap_err(),
            WorldError::UnknownOwner(OwnerId(7))
        );
        assert_eq!(
            world
                .apply_effect(HERO, "nope", HERO, ApplyOptions::default())
                .unwrap_err(),
            WorldError::UnknownDefinition("nope".into())
        );
    }

    #[test]
    fn manual_remove_runs_only_on_remove() {
        let (mut world, log) = world_with(EffectDefinition::new("ward", "Ward", 5.0).unique());
        world
            .apply_effect(HERO, "ward", HERO, ApplyOptions::default())
            .unwrap();
        assert!(world.remove_effect(HERO, "ward", RemoveCause::Manual, false).is_some());
        assert!(world.remove_effect(HERO, "ward", RemoveCause::Manual, false).is_none());
        assert_eq!(*log.lock().unwrap(), vec!["apply:1", "remove"]);
    }

    #[test]
    fn quiet_remove_skips_hooks() {
        let (mut world, log) = world_with(EffectDefinition::new("ward", "Ward", 5.0).unique());
        world
            .apply_effect(HERO, "ward", HERO, ApplyOptions::default())
            .unwrap();
        world.remove_effect(HERO, "ward", RemoveCause::Dispel, true);
        assert_eq!(*log.lock().unwrap(), vec!["apply:1"]);
    }

    #[test]
    fn reentrant_removal_is_a_no_op() {
        let mut catalog = EffectCatalog::new();
        catalog
            .register_with(EffectDefinition::new("loop", "Loop", 5.0).unique(), Reentrant)
            .unwrap();
        let mut world = World::new(catalog);
        world.spawn(HERO, Combatant::new("hero", 50)).unwrap();
        world
            .apply_effect(HERO, "loop", HERO, ApplyOptions::default())
            .unwrap();
        assert!(world.remove_effect(HERO, "loop", RemoveCause::Manual, false).is_some());
        assert!(world.effects(HERO).unwrap().is_empty());
    }

    #[test]
    fn expiry_sweep_runs_expire_then_remove() {
        let (mut world, log) = world_with(EffectDefinition::new("ward", "Ward", 5.0).unique());
        world
            .apply_effect(HERO, "ward", HERO, ApplyOptions::default())
            .unwrap();

        world.advance(5.0);
        assert!(world.effects(HERO).unwrap().contains("ward"));
        world.advance(0.2);
        assert!(world.effects(HERO).unwrap().is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["apply:1", "expire", "remove"]);
    }

    #[test]
    fn reapply_after_lifetime_sweeps_before_stacking() {
        let (mut world, log) =
            world_with(EffectDefinition::new("bleed", "Bleed", 5.0).unique().stacking(5));
        world
            .apply_effect(HERO, "bleed", HERO, ApplyOptions::stacks(2))
            .unwrap();

        // Past the lifetime, before the sweep due at 5.1.
        world.advance(5.05);
        let fresh = world
            .apply_effect(HERO, "bleed", HERO, ApplyOptions::default())
            .unwrap();
        assert_eq!(fresh.stacks, 1);
        assert_eq!(fresh.start, 5.05);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["apply:2", "expire", "remove", "apply:1"]
        );

        world.advance(0.1);
        assert!(world.effects(HERO).unwrap().contains("bleed"));
    }

    #[test]
    fn dispel_matches_by_definition() {
        let (mut world, log) =
            world_with(EffectDefinition::new("curse", "Curse", INFINITE_DURATION).combat());
        world
            .apply_effect(HERO, "curse", OwnerId(2), ApplyOptions::default())
            .unwrap();
        world
            .apply_effect(HERO, "curse", OwnerId(3), ApplyOptions::default())
            .unwrap();

        let removed = world.dispel(HERO, |definition, instance| {
            definition.flags.contains(crate::EffectFlags::COMBAT) && instance.source == OwnerId(3)
        });
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].key, "curse#3");
        assert_eq!(world.effects(HERO).unwrap().len(), 1);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["apply:1", "apply:1", "dispel", "remove"]
        );
    }

    #[test]
    fn paused_effect_keeps_remaining_time() {
        let (mut world, _) = world_with(EffectDefinition::new("ward", "Ward", 10.0).unique());
        world
            .apply_effect(HERO, "ward", HERO, ApplyOptions::default())
            .unwrap();
        world.advance(4.0);
        world.pause_effect(HERO, "ward").unwrap();
        assert!(world.pause_effect(HERO, "ward").is_none());

        world.advance(100.0);
        let view = world.view_effects(HERO);
        assert_eq!(view.len(), 1);
        assert!(view[0].paused);
        assert_eq!(view[0].remaining, Some(6.0));

        world.unpause_effect(HERO, "ward").unwrap();
        world.advance(5.9);
        assert!(world.effects(HERO).unwrap().contains("ward"));
        world.advance(0.5);
        assert!(world.effects(HERO).unwrap().is_empty());
    }

    #[test]
    fn perks_are_permanent_and_keyed_by_slot() {
        let (mut world, _) = world_with(EffectDefinition::new("keen", "Keen", 30.0));
        let first = world.apply_perk(HERO, "keen", OwnerId(100)).unwrap();
        let second = world.apply_perk(HERO, "keen", OwnerId(101)).unwrap();
        assert!(first.is_infinite());
        assert_ne!(first.key, second.key);

        world.advance(1_000.0);
        assert_eq!(world.effects(HERO).unwrap().len(), 2);
        assert!(world.remove_effect(HERO, &first.key, RemoveCause::Manual, false).is_some());
        assert_eq!(world.effects(HERO).unwrap().len(), 1);
    }

    #[test]
    fn view_reports_names_and_infinite_remaining() {
        let (mut world, _) = world_with(
            EffectDefinition::new("aura", "Aura", INFINITE_DURATION)
                .unique()
                .flavor("A faint glow."),
        );
        world
            .apply_effect(HERO, "aura", HERO, ApplyOptions::default())
            .unwrap();
        let view = world.view_effects(HERO);
        assert_eq!(view[0].name, "Aura");
        assert_eq!(view[0].flavor, "A faint glow.");
        assert_eq!(view[0].remaining, None);
    }
}
