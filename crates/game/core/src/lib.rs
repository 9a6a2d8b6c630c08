//! Timed-modifier engine and combat resolution.
//!
//! `effect-core` owns the canonical rules for buffs, perks and other timed
//! effects: how they stack, refresh and expire, how they modify stat queries,
//! how tagged events fire their hooks, and how an attack resolves into
//! hit/crit/damage/death. All state mutation flows through [`World`], the
//! single-writer context that owns every combatant, its [`ModifierStore`], the
//! injected [`Scheduler`] and the [`EventBus`].
//!
//! The crate is synchronous and performs no I/O. Time is virtual and advanced
//! explicitly through [`World::advance`]; async orchestration lives in the
//! runtime crate.
pub mod combat;
pub mod config;
pub mod effect;
pub mod env;
pub mod error;
pub mod events;
pub mod schedule;
pub mod state;
pub mod stats;
pub mod world;

pub use combat::{
    AttackReport, CombatContext, InjuryReport, OpposedRoll, ShotOutcome, WeaponStats,
    opposed_roll,
};
pub use config::EngineConfig;
pub use effect::{
    ApplyKind, ApplyOptions, DefinitionError, EffectCatalog, EffectDefinition, EffectFlags,
    EffectHooks, EffectInstance, EffectView, HookTable, INFINITE_DURATION, Modifier,
    ModifierOp, ModifierStore, NoHooks, RemoveCause, TickGenerations,
};
pub use env::{
    AttributeError, AttributeStore, MemoryAttributes, MessageSink, NullSink, PcgRng,
    RecordingSink, RollSource, SentMessage, SequenceRng,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{EventBus, EventEnvelope, EventId, EventPayload, TriggerContext};
pub use schedule::{Scheduler, Timer, TimerId, TimerPayload, TimerSnapshot, TimerTable};
pub use state::{Combatant, LifeState, OwnerId};
pub use stats::{ModifierTotals, tags as stat_tags};
pub use world::{Owner, World, WorldBuilder, WorldError};
