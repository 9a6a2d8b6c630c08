//! Async orchestration for the effect engine.
//!
//! This crate hosts a [`World`](effect_core::World) inside a single tokio task
//! and exposes it through a cloneable [`RuntimeHandle`]. Every mutation is a
//! queued command, so hooks, timers and combat resolution all run on one
//! logical timeline while callers stay fully async.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`repository`] persists owners and timers between sessions
//! - [`logging`] and [`dirs`] set up tracing output and platform paths
//! - [`rng`] provides the production roll source
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod dirs;
pub mod logging;
pub mod repository;
pub mod rng;
pub mod runtime;

mod workers;

pub use api::{ChannelSink, Result, RuntimeError, RuntimeHandle};
pub use repository::{FileAttributeStore, RepositoryError};
pub use rng::GameRng;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
