//! Effect system: definitions, instances, hooks and per-owner stores.
//!
//! ```text
//! EffectDefinition (authored, immutable)
//!      │ registered into
//!      ▼
//! EffectCatalog ── resolves hook id ──► Arc<dyn EffectHooks>
//!      │ applied through World
//!      ▼
//! ModifierStore (per owner) ── holds ──► EffectInstance
//! ```
mod catalog;
mod definition;
mod hooks;
mod instance;
mod store;

pub use catalog::{CatalogEntry, EffectCatalog};
pub use definition::{
    DefinitionError, EffectDefinition, EffectFlags, INFINITE_DURATION, Modifier, ModifierOp,
};
pub use hooks::{EffectHooks, HookTable, NoHooks};
pub use instance::EffectInstance;
pub use store::{ApplyKind, ApplyOptions, ModifierStore, TickGenerations};

/// Why an instance left its store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RemoveCause {
    /// Explicit removal (including death clearing).
    Manual,
    /// Removed by a dispel.
    Dispel,
    /// Lifetime ran out.
    Expire,
}

/// Presentation-only listing entry.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectView {
    pub key: String,
    pub name: String,
    pub flavor: String,
    pub stacks: u32,
    /// Seconds left, `None` for permanent effects.
    pub remaining: Option<f64>,
    pub paused: bool,
}
