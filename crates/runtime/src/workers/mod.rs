//! Worker tasks that back the runtime orchestration.
//!
//! The world worker owns the authoritative [`effect_core::World`] and executes
//! commands one at a time; the clock worker turns wall-clock time into
//! `advance` commands.

mod clock;
mod world;

pub use clock::ClockWorker;
pub use world::{Command, WorldWorker};
