//! Stat queries: folding the active modifiers of one owner into a value.

use std::sync::Arc;

use tracing::trace;

use super::ModifierTotals;
use crate::effect::{EffectHooks, EffectInstance};
use crate::state::OwnerId;
use crate::world::World;

impl World {
    /// Evaluates `stat` for `owner` starting from `base`.
    ///
    /// Every unpaused instance whose definition declares a modifier for the
    /// stat and whose `conditional` hook passes contributes:
    /// `(base + Σ add) × (1 + Σ multiply)`. Unless `quiet`, each matched
    /// instance then sees the final value through `after_check`, in store
    /// order. An unknown owner returns `base` unchanged.
    pub fn check(&mut self, owner: OwnerId, base: f64, stat: &str, quiet: bool) -> f64 {
        let matched = self.matching_instances(owner, stat);
        if matched.is_empty() {
            return base;
        }

        let mut totals = ModifierTotals::new();
        for (instance, _) in &matched {
            if let Some(definition) = self.catalog.definition(&instance.definition) {
                for modifier in definition.modifiers_for(stat) {
                    totals.add(modifier, instance.stacks);
                }
            }
        }
        let value = totals.apply(base);
        trace!(%owner, stat, base, value, modifiers = totals.count, "stat check");

        if !quiet {
            for (instance, hooks) in &matched {
                hooks.after_check(self, instance, stat, value);
            }
        }
        value
    }

    /// Snapshot of the instances on `owner` that modify `stat` right now.
    fn matching_instances(
        &self,
        owner: OwnerId,
        stat: &str,
    ) -> Vec<(EffectInstance, Arc<dyn EffectHooks>)> {
        let Some(entry) = self.owners.get(&owner) else {
            return Vec::new();
        };
        entry
            .effects
            .iter()
            .filter(|instance| !instance.paused)
            .filter_map(|instance| {
                let catalog_entry = self.catalog.get(&instance.definition)?;
                catalog_entry
                    .definition
                    .modifiers_for(stat)
                    .next()
                    .map(|_| (instance, Arc::clone(&catalog_entry.hooks)))
            })
            .filter(|(instance, hooks)| hooks.conditional(self, instance))
            .map(|(instance, hooks)| (instance.clone(), hooks))
            .collect()
    }
}
