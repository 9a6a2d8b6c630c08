//! Per-owner collection of effect instances.
//!
//! [`ModifierStore`] holds the data and the merge rules (stack, refresh,
//! replace, pause arithmetic). It never calls hooks or touches the scheduler;
//! the world wraps each mutation with the hook calls and timers it implies.

use super::{EffectDefinition, EffectInstance};
use crate::state::OwnerId;

/// Options for applying an effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApplyOptions {
    /// Stacks to add (at least one is always applied).
    pub stacks: u32,
    /// Overrides the definition's duration template.
    pub duration: Option<f64>,
}

impl ApplyOptions {
    pub fn stacks(stacks: u32) -> Self {
        Self {
            stacks,
            ..Self::default()
        }
    }

    pub fn duration(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            stacks: 1,
            duration: None,
        }
    }
}

/// What an apply did to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ApplyKind {
    /// No instance existed under the key.
    Created,
    /// An instance existed and the definition neither stacks nor refreshes,
    /// so a fresh instance took its place.
    Replaced,
    /// Stacks were added to the existing instance.
    Stacked,
    /// The existing instance's lifetime restarted.
    Refreshed,
    /// Both of the above.
    StackedAndRefreshed,
}

impl ApplyKind {
    /// Returns true if a brand-new instance (with a new tick chain) exists.
    pub fn is_new(self) -> bool {
        matches!(self, Self::Created | Self::Replaced)
    }

    /// Returns true if the instance's lifetime starts at the apply time.
    pub fn restarts_lifetime(self) -> bool {
        !matches!(self, Self::Stacked)
    }
}

/// Monotonic source of tick generations.
///
/// A world holds one counter for every store it owns, so a generation is
/// never handed out twice, even after a despawn or a restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickGenerations {
    next: u64,
}

impl TickGenerations {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Generation the next call to [`bump`](Self::bump) returns.
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn bump(&mut self) -> u64 {
        let generation = self.next;
        self.next += 1;
        generation
    }

    /// Ensures no generation at or below `generation` is handed out again.
    pub fn skip_past(&mut self, generation: u64) {
        self.next = self.next.max(generation.saturating_add(1));
    }
}

impl Default for TickGenerations {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered mapping `instance key -> EffectInstance` for one owner.
///
/// Insertion order is preserved (a replaced instance keeps its slot) so hook
/// iteration is deterministic.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierStore {
    owner: OwnerId,
    instances: Vec<EffectInstance>,
}

impl ModifierStore {
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            instances: Vec::new(),
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.instances.iter()
    }

    pub fn get(&self, key: &str) -> Option<&EffectInstance> {
        self.instances.iter().find(|inst| inst.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.instances.iter().position(|inst| inst.key == key)
    }

    /// Applies `definition` from `source`, merging with any instance under the
    /// same key, and returns what happened plus a snapshot of the result.
    ///
    /// A created or replaced instance draws its tick generation from
    /// `generations`.
    pub fn merge(
        &mut self,
        definition: &EffectDefinition,
        source: OwnerId,
        options: ApplyOptions,
        now: f64,
        generations: &mut TickGenerations,
    ) -> (ApplyKind, EffectInstance) {
        let key = definition.instance_key(source);
        let duration = options.duration.unwrap_or(definition.duration);
        let added = options.stacks.max(1);
        let cap = definition.stack_cap();

        let Some(index) = self.position(&key) else {
            let fresh = self.fresh(
                key,
                definition,
                source,
                added.min(cap),
                duration,
                now,
                generations.bump(),
            );
            self.instances.push(fresh.clone());
            return (ApplyKind::Created, fresh);
        };

        let stacking = definition.is_stacking();
        let refresh = definition.is_refresh();
        if !stacking && !refresh {
            let fresh = self.fresh(
                key,
                definition,
                source,
                added.min(cap),
                duration,
                now,
                generations.bump(),
            );
            self.instances[index] = fresh.clone();
            return (ApplyKind::Replaced, fresh);
        }

        let existing = &mut self.instances[index];
        if stacking {
            existing.stacks = existing.stacks.saturating_add(added).min(cap);
        }
        if refresh {
            existing.start = now;
            existing.duration = duration;
        }
        let kind = match (stacking, refresh) {
            (true, true) => ApplyKind::StackedAndRefreshed,
            (true, false) => ApplyKind::Stacked,
            _ => ApplyKind::Refreshed,
        };
        (kind, existing.clone())
    }

    #[allow(clippy::too_many_arguments)]
    fn fresh(
        &self,
        key: String,
        definition: &EffectDefinition,
        source: OwnerId,
        stacks: u32,
        duration: f64,
        now: f64,
        tick_generation: u64,
    ) -> EffectInstance {
        EffectInstance {
            key,
            definition: definition.key.clone(),
            owner: self.owner,
            source,
            stacks,
            start: now,
            duration,
            last_tick: None,
            paused: false,
            tick_generation,
        }
    }

    /// Inserts an instance as-is, replacing one with the same key in place.
    ///
    /// Used when restoring persisted instances.
    pub fn insert(&mut self, mut instance: EffectInstance) {
        instance.owner = self.owner;
        match self.position(&instance.key) {
            Some(index) => self.instances[index] = instance,
            None => self.instances.push(instance),
        }
    }

    /// Removes and returns the instance under `key`.
    pub fn take(&mut self, key: &str) -> Option<EffectInstance> {
        let index = self.position(key)?;
        Some(self.instances.remove(index))
    }

    /// Keys of every instance expired at `now`, in store order.
    pub fn expired_keys(&self, now: f64) -> Vec<String> {
        self.keys_where(|inst| inst.is_expired(now))
    }

    /// Keys of every instance matching `predicate`, in store order.
    pub fn keys_where(&self, mut predicate: impl FnMut(&EffectInstance) -> bool) -> Vec<String> {
        self.instances
            .iter()
            .filter(|inst| predicate(inst))
            .map(|inst| inst.key.clone())
            .collect()
    }

    /// Freezes the remaining lifetime of an instance.
    ///
    /// Returns the paused snapshot, or `None` if the key is missing or the
    /// instance is already paused.
    pub fn pause(&mut self, key: &str, now: f64) -> Option<EffectInstance> {
        let index = self.position(key)?;
        let inst = &mut self.instances[index];
        if inst.paused {
            return None;
        }
        if !inst.is_infinite() {
            inst.duration = (inst.start + inst.duration - now).max(0.0);
        }
        inst.start = now;
        inst.paused = true;
        Some(inst.clone())
    }

    /// Resumes a paused instance with its frozen remaining time.
    ///
    /// The instance gets a new tick generation from `generations`, so any
    /// chain scheduled before the pause stays stale.
    pub fn unpause(
        &mut self,
        key: &str,
        now: f64,
        generations: &mut TickGenerations,
    ) -> Option<EffectInstance> {
        let index = self.position(key)?;
        if !self.instances[index].paused {
            return None;
        }
        let generation = generations.bump();
        let inst = &mut self.instances[index];
        inst.start = now;
        inst.paused = false;
        inst.tick_generation = generation;
        Some(inst.clone())
    }

    /// Records that a tick ran at `now`.
    pub fn record_tick(&mut self, key: &str, now: f64) {
        if let Some(index) = self.position(key) {
            self.instances[index].last_tick = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: OwnerId = OwnerId(1);

    fn store() -> ModifierStore {
        ModifierStore::new(OWNER)
    }

    #[test]
    fn stacking_is_capped() {
        let def = EffectDefinition::new("focus", "Focus", 10.0).stacking(3);
        let mut store = store();
        let mut gens = TickGenerations::new();
        for _ in 0..5 {
            store.merge(&def, OWNER, ApplyOptions::default(), 0.0, &mut gens);
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("focus#1").unwrap().stacks, 3);
    }

    #[test]
    fn initial_stacks_are_capped_too() {
        let def = EffectDefinition::new("focus", "Focus", 10.0).stacking(3);
        let mut store = store();
        let mut gens = TickGenerations::new();
        let (kind, inst) =
            store.merge(&def, OWNER, ApplyOptions::stacks(7), 0.0, &mut gens);
        assert_eq!(kind, ApplyKind::Created);
        assert_eq!(inst.stacks, 3);
    }

    #[test]
    fn refresh_restarts_lifetime_without_touching_stacks() {
        let def = EffectDefinition::new("ward", "Ward", 10.0).refresh();
        let mut store = store();
        let mut gens = TickGenerations::new();
        store.merge(&def, OWNER, ApplyOptions::default(), 0.0, &mut gens);
        let (kind, inst) =
            store.merge(&def, OWNER, ApplyOptions::default(), 6.0, &mut gens);
        assert_eq!(kind, ApplyKind::Refreshed);
        assert_eq!(inst.start, 6.0);
        assert_eq!(inst.elapsed(6.0), 0.0);
        assert_eq!(inst.stacks, 1);
    }

    #[test]
    fn stacking_without_refresh_keeps_start() {
        let def = EffectDefinition::new("bleed", "Bleed", 10.0).stacking(5);
        let mut store = store();
        let mut gens = TickGenerations::new();
        store.merge(&def, OWNER, ApplyOptions::default(), 0.0, &mut gens);
        let (kind, inst) =
            store.merge(&def, OWNER, ApplyOptions::default(), 4.0, &mut gens);
        assert_eq!(kind, ApplyKind::Stacked);
        assert_eq!(inst.start, 0.0);
        assert_eq!(inst.stacks, 2);
    }

    #[test]
    fn plain_reapply_replaces_in_place() {
        let a = EffectDefinition::new("a", "A", 10.0);
        let b = EffectDefinition::new("b", "B", 10.0);
        let mut store = store();
        let mut gens = TickGenerations::new();
        store.merge(&a, OWNER, ApplyOptions::default(), 0.0, &mut gens);
        store.merge(&b, OWNER, ApplyOptions::default(), 0.0, &mut gens);
        let before = store.get("a#1").unwrap().tick_generation;

        let (kind, inst) =
            store.merge(&a, OWNER, ApplyOptions::duration(3.0), 5.0, &mut gens);
        assert_eq!(kind, ApplyKind::Replaced);
        assert_eq!(inst.duration, 3.0);
        assert_ne!(inst.tick_generation, before);

        let keys: Vec<_> = store.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["a#1", "b#1"]);
    }

    #[test]
    fn unique_collapses_sources() {
        let def = EffectDefinition::new("rage", "Rage", 10.0).unique();
        let mut store = store();
        let mut gens = TickGenerations::new();
        store.merge(&def, OwnerId(2), ApplyOptions::default(), 0.0, &mut gens);
        store.merge(&def, OwnerId(3), ApplyOptions::default(), 0.0, &mut gens);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("rage").unwrap().source, OwnerId(3));
    }

    #[test]
    fn non_unique_keeps_one_instance_per_source() {
        let def = EffectDefinition::new("mark", "Mark", 10.0);
        let mut store = store();
        let mut gens = TickGenerations::new();
        store.merge(&def, OwnerId(2), ApplyOptions::default(), 0.0, &mut gens);
        store.merge(&def, OwnerId(3), ApplyOptions::duration(4.0), 1.0, &mut gens);
        assert_eq!(store.len(), 2);
        assert_eq!(store.expired_keys(5.5), vec!["mark#3".to_string()]);
    }

    #[test]
    fn pause_freezes_remaining_time() {
        let def = EffectDefinition::new("ward", "Ward", 10.0);
        let mut store = store();
        let mut gens = TickGenerations::new();
        store.merge(&def, OWNER, ApplyOptions::default(), 0.0, &mut gens);

        let paused = store.pause("ward#1", 4.0).unwrap();
        assert!(paused.paused);
        assert_eq!(paused.duration, 6.0);
        assert!(store.pause("ward#1", 5.0).is_none());
        assert!(store.expired_keys(1_000.0).is_empty());

        let resumed = store.unpause("ward#1", 500.0, &mut gens).unwrap();
        assert_eq!(resumed.start, 500.0);
        assert_eq!(resumed.duration, 6.0);
        assert!(!store.get("ward#1").unwrap().is_expired(506.0));
        assert!(store.get("ward#1").unwrap().is_expired(506.05));
    }

    #[test]
    fn generations_never_repeat_across_stores() {
        let def = EffectDefinition::new("ward", "Ward", 10.0).unique();
        let mut gens = TickGenerations::new();
        let mut first = ModifierStore::new(OwnerId(1));
        let mut second = ModifierStore::new(OwnerId(2));
        let (_, a) = first.merge(&def, OWNER, ApplyOptions::default(), 0.0, &mut gens);
        let (_, b) = second.merge(&def, OWNER, ApplyOptions::default(), 0.0, &mut gens);
        assert_ne!(a.tick_generation, b.tick_generation);

        gens.skip_past(10);
        assert_eq!(gens.bump(), 11);
        gens.skip_past(3);
        assert_eq!(gens.peek(), 12);
    }

    #[test]
    fn take_missing_is_none() {
        let mut store = store();
        assert!(store.take("nothing").is_none());
    }
}
