//! Behavior bound to effect definitions.
//!
//! Each definition resolves to one [`EffectHooks`] implementation at
//! registration. Hooks follow the Strategy pattern: the store, stat engine,
//! trigger dispatcher and timers call into them at fixed points, handing over
//! the world so a hook can apply or remove other effects, injure, publish
//! events and so on.
//!
//! Hooks always receive a snapshot of the instance. The live entry may have
//! changed or disappeared by the time the hook runs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::EffectInstance;
use crate::events::TriggerContext;
use crate::world::World;

/// Lifecycle and reaction points of an effect.
///
/// Every method has a no-op default so implementations only override what
/// they need.
pub trait EffectHooks: Send + Sync {
    /// Called on every apply, including stack and refresh merges.
    fn on_apply(&self, _world: &mut World, _effect: &EffectInstance) {}

    /// Called after any non-quiet removal, after the cause-specific hook.
    fn on_remove(&self, _world: &mut World, _effect: &EffectInstance) {}

    fn on_dispel(&self, _world: &mut World, _effect: &EffectInstance) {}

    fn on_expire(&self, _world: &mut World, _effect: &EffectInstance) {}

    /// Called when a trigger tag this effect listens to is fired.
    fn on_trigger(&self, _world: &mut World, _ctx: &TriggerContext) {}

    /// Called on each periodic tick of a ticking effect.
    fn on_tick(&self, _world: &mut World, _effect: &EffectInstance) {}

    /// Called after a non-quiet stat check this effect contributed to.
    fn after_check(&self, _world: &mut World, _effect: &EffectInstance, _stat: &str, _value: f64) {
    }

    /// Gate for stat contribution. Defaults to always contributing.
    fn conditional(&self, _world: &World, _effect: &EffectInstance) -> bool {
        true
    }
}

/// Hooks that do nothing; used by definitions without behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl EffectHooks for NoHooks {}

/// Named hook implementations that definitions reference by id.
#[derive(Clone, Default)]
pub struct HookTable {
    hooks: HashMap<String, Arc<dyn EffectHooks>>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an implementation under `id`, replacing any previous one.
    pub fn insert(&mut self, id: impl Into<String>, hooks: Arc<dyn EffectHooks>) {
        self.hooks.insert(id.into(), hooks);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, hooks: impl EffectHooks + 'static) -> Self {
        self.insert(id, Arc::new(hooks));
        self
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn EffectHooks>> {
        self.hooks.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.hooks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.hooks.keys().collect();
        ids.sort();
        f.debug_struct("HookTable").field("ids", &ids).finish()
    }
}
