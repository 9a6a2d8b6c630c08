//! Data-driven effect content and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Effect definitions (data-driven via RON)
//! - Weapon tables (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! Definitions are validated while loading, so a malformed catalog fails at
//! start-up instead of at apply time. Hook implementations stay in code and
//! are bound by id through an [`effect_core::HookTable`].
//!
//! All loaders use effect-core types directly with serde for RON/TOML
//! deserialization.

pub mod hooks;
pub mod weapons;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use hooks::standard_hooks;
pub use weapons::{WeaponCatalog, WeaponError};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, EffectLoader, LoadResult, WeaponLoader};
