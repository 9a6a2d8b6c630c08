//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the world.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use effect_core::{
    AttributeStore, EffectCatalog, EngineConfig, EventEnvelope, SentMessage, World,
};

use crate::api::{ChannelSink, Result, RuntimeError, RuntimeHandle};
use crate::rng::GameRng;
use crate::workers::{ClockWorker, WorldWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    pub event_buffer_size: usize,
    pub message_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Wall-clock cadence of the clock worker. `None` leaves time to explicit
    /// `advance` calls.
    pub tick_interval: Option<Duration>,
    /// Virtual seconds per real second when the clock worker runs.
    pub time_scale: f64,
    /// Seed for combat rolls. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            event_buffer_size: 256,
            message_buffer_size: 64,
            command_buffer_size: 32,
            tick_interval: None,
            time_scale: 1.0,
            seed: None,
        }
    }
}

/// Main runtime that hosts the world.
///
/// Runtime owns the workers; [`RuntimeHandle`] provides a cloneable façade
/// for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    world_worker_handle: JoinHandle<()>,
    clock_worker_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to world events
    pub fn subscribe_events(&self) -> broadcast::Receiver<EventEnvelope> {
        self.handle.subscribe_events()
    }

    /// Subscribe to player-facing notices
    pub fn subscribe_messages(&self) -> broadcast::Receiver<SentMessage> {
        self.handle.subscribe_messages()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Stops the clock, lets the world worker drain the commands already
    /// queued, then waits for it to exit.
    pub async fn shutdown(self) -> Result<()> {
        if let Some(clock) = self.clock_worker_handle {
            clock.abort();
            let _ = clock.await;
        }

        self.handle.shutdown().await?;
        drop(self.handle);

        self.world_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<EffectCatalog>,
    world: Option<World>,
    repository: Option<Box<dyn AttributeStore>>,
    load_on_start: bool,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            world: None,
            repository: None,
            load_on_start: false,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Effect definitions for a world built by the runtime.
    pub fn catalog(mut self, catalog: EffectCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Host a prebuilt world instead of building one.
    ///
    /// The world keeps its own scheduler, roll source and message sink, so
    /// `subscribe_messages` receives nothing from it.
    pub fn world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    /// Store used by `save` and `load`.
    pub fn repository(mut self, repository: impl AttributeStore + 'static) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    /// Restore the saved world from the repository before accepting commands.
    pub fn load_on_start(mut self, load: bool) -> Self {
        self.load_on_start = load;
        self
    }

    /// Enable the wall-clock driver.
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval = Some(interval);
        self
    }

    /// Seed combat rolls for a reproducible session.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build and start the runtime
    pub async fn build(self) -> Result<Runtime> {
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let (event_tx, _) = broadcast::channel(self.config.event_buffer_size);
        let (message_tx, _) = broadcast::channel(self.config.message_buffer_size);

        let world = match (self.world, self.catalog) {
            (Some(world), _) => world,
            (None, Some(catalog)) => {
                let rng = match self.config.seed {
                    Some(seed) => GameRng::seeded(seed),
                    None => GameRng::from_entropy(),
                };
                World::builder()
                    .config(self.config.engine.clone())
                    .catalog(catalog)
                    .rng(rng)
                    .sink(ChannelSink::new(message_tx.clone()))
                    .build()
            }
            (None, None) => return Err(RuntimeError::MissingWorld),
        };

        if self.load_on_start && self.repository.is_none() {
            return Err(RuntimeError::MissingRepository);
        }

        let handle = RuntimeHandle::new(command_tx.clone(), event_tx.clone(), message_tx);

        let worker = WorldWorker::new(world, self.repository, command_rx, event_tx);
        let world_worker_handle = tokio::spawn(worker.run());

        if self.load_on_start {
            let owners = handle.load().await?;
            tracing::info!("Restored {} owners on start", owners);
        }

        let clock_worker_handle = self.config.tick_interval.map(|interval| {
            let clock = ClockWorker::new(command_tx.clone(), interval, self.config.time_scale);
            tokio::spawn(clock.run())
        });

        Ok(Runtime {
            handle,
            world_worker_handle,
            clock_worker_handle,
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

