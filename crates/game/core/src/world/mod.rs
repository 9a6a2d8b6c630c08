//! The single-writer world context.
//!
//! [`World`] owns every combatant and its [`ModifierStore`], the effect
//! catalog, the injected scheduler, roll source and message sink, and the
//! event bus. Every mutation goes through `&mut World`, hooks included, so
//! cross-owner effects (a hook on one owner damaging another) are serialized
//! by construction and no hook can observe a store mid-mutation.
mod effects;
mod error;
#[cfg(feature = "serde")]
mod persistence;
mod timers;

use std::collections::BTreeMap;

use tracing::debug;

pub use error::WorldError;
#[cfg(feature = "serde")]
pub use persistence::{COMBATANT_ATTRIBUTE, EFFECTS_ATTRIBUTE};

use crate::config::EngineConfig;
use crate::effect::{EffectCatalog, ModifierStore, TickGenerations};
use crate::env::{MessageSink, NullSink, PcgRng, RollSource};
use crate::events::EventBus;
use crate::schedule::{Scheduler, TimerTable};
use crate::state::{Combatant, OwnerId};

/// Everything the world tracks for one owner.
#[derive(Clone, Debug, PartialEq)]
pub struct Owner {
    pub combatant: Combatant,
    pub effects: ModifierStore,
}

impl Owner {
    pub fn new(id: OwnerId, combatant: Combatant) -> Self {
        Self {
            combatant,
            effects: ModifierStore::new(id),
        }
    }

    pub fn id(&self) -> OwnerId {
        self.effects.owner()
    }
}

/// Single-writer context for effects and combat.
pub struct World {
    pub(crate) config: EngineConfig,
    pub(crate) catalog: EffectCatalog,
    pub(crate) owners: BTreeMap<OwnerId, Owner>,
    pub(crate) generations: TickGenerations,
    pub(crate) scheduler: Box<dyn Scheduler>,
    pub(crate) bus: EventBus,
    pub(crate) rng: Box<dyn RollSource>,
    pub(crate) sink: Box<dyn MessageSink>,
}

impl World {
    /// Creates a world with default config, a fresh [`TimerTable`], a
    /// zero-seeded [`PcgRng`] and a [`NullSink`].
    pub fn new(catalog: EffectCatalog) -> Self {
        WorldBuilder::new().catalog(catalog).build()
    }

    pub fn builder() -> WorldBuilder {
        WorldBuilder::new()
    }

    /// Current world time in seconds.
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &EffectCatalog {
        &self.catalog
    }

    /// Mutable catalog access for registering definitions after start-up.
    pub fn catalog_mut(&mut self) -> &mut EffectCatalog {
        &mut self.catalog
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        self.scheduler.as_ref()
    }

    /// Adds an owner with an empty store and subscribes it to the bus.
    pub fn spawn(&mut self, id: OwnerId, combatant: Combatant) -> Result<&mut Owner, WorldError> {
        if self.owners.contains_key(&id) {
            return Err(WorldError::OwnerExists(id));
        }
        debug!(owner = %id, name = %combatant.name, "spawned owner");
        self.bus.subscribe(id);
        Ok(self.owners.entry(id).or_insert(Owner::new(id, combatant)))
    }

    /// Removes an owner and unsubscribes it. Pending timers for it become
    /// no-ops.
    pub fn despawn(&mut self, id: OwnerId) -> Option<Owner> {
        self.bus.unsubscribe(id);
        let owner = self.owners.remove(&id);
        if owner.is_some() {
            debug!(owner = %id, "despawned owner");
        }
        owner
    }

    pub fn contains(&self, id: OwnerId) -> bool {
        self.owners.contains_key(&id)
    }

    pub fn owner(&self, id: OwnerId) -> Option<&Owner> {
        self.owners.get(&id)
    }

    pub fn owner_mut(&mut self, id: OwnerId) -> Option<&mut Owner> {
        self.owners.get_mut(&id)
    }

    /// Owner ids in ascending order.
    pub fn owner_ids(&self) -> impl Iterator<Item = OwnerId> + '_ {
        self.owners.keys().copied()
    }

    pub fn combatant(&self, id: OwnerId) -> Option<&Combatant> {
        self.owners.get(&id).map(|owner| &owner.combatant)
    }

    pub fn combatant_mut(&mut self, id: OwnerId) -> Option<&mut Combatant> {
        self.owners.get_mut(&id).map(|owner| &mut owner.combatant)
    }

    /// The modifier store of `id`.
    pub fn effects(&self, id: OwnerId) -> Option<&ModifierStore> {
        self.owners.get(&id).map(|owner| &owner.effects)
    }

    /// Uniform sample in `[0, 1)` from the world's roll source.
    pub fn roll(&mut self) -> f64 {
        self.rng.next_f64()
    }

    /// Sends text to one owner through the message sink.
    pub fn message(&mut self, owner: OwnerId, text: &str) {
        self.sink.message(owner, text);
    }

    /// Sends text to everyone near `origin` except `exclude`.
    pub fn broadcast(&mut self, origin: OwnerId, text: &str, exclude: &[OwnerId]) {
        self.sink.broadcast(origin, text, exclude);
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("now", &self.now())
            .field("owners", &self.owners.len())
            .field("definitions", &self.catalog.len())
            .field("pending_timers", &self.scheduler.pending())
            .finish()
    }
}

/// Builder for [`World`].
pub struct WorldBuilder {
    config: EngineConfig,
    catalog: EffectCatalog,
    scheduler: Option<Box<dyn Scheduler>>,
    rng: Option<Box<dyn RollSource>>,
    sink: Option<Box<dyn MessageSink>>,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            catalog: EffectCatalog::new(),
            scheduler: None,
            rng: None,
            sink: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn catalog(mut self, catalog: EffectCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    #[must_use]
    pub fn rng(mut self, rng: impl RollSource + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Uses a [`PcgRng`] seeded with `seed`.
    #[must_use]
    pub fn seed(self, seed: u64) -> Self {
        self.rng(PcgRng::seeded(seed))
    }

    #[must_use]
    pub fn sink(mut self, sink: impl MessageSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn build(self) -> World {
        World {
            bus: EventBus::new(self.config.event_history),
            config: self.config,
            catalog: self.catalog,
            owners: BTreeMap::new(),
            generations: TickGenerations::new(),
            scheduler: self
                .scheduler
                .unwrap_or_else(|| Box::new(TimerTable::new())),
            rng: self.rng.unwrap_or_else(|| Box::new(PcgRng::default())),
            sink: self.sink.unwrap_or_else(|| Box::new(NullSink)),
        }
    }
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}
