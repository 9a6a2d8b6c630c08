//! World worker that owns the authoritative [`World`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs them
//! against the world, and forwards every event the world published onto the
//! runtime's broadcast channel.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use effect_core::{
    ApplyOptions, AttackReport, AttributeStore, Combatant, EffectInstance, EffectView, EventEnvelope,
    EventPayload, InjuryReport, OwnerId, RemoveCause, WeaponStats, World,
};

use crate::api::{Result, RuntimeError};
use crate::repository::{OWNERS_ATTRIBUTE, RepositoryError, TIMERS_ATTRIBUTE};

/// Commands that can be sent to the world worker.
pub enum Command {
    Spawn {
        id: OwnerId,
        combatant: Combatant,
        reply: oneshot::Sender<Result<()>>,
    },
    Despawn {
        id: OwnerId,
        reply: oneshot::Sender<bool>,
    },
    QueryCombatant {
        id: OwnerId,
        reply: oneshot::Sender<Option<Combatant>>,
    },
    Apply {
        owner: OwnerId,
        definition: String,
        source: OwnerId,
        options: ApplyOptions,
        reply: oneshot::Sender<Result<EffectInstance>>,
    },
    ApplyPerk {
        owner: OwnerId,
        definition: String,
        slot: OwnerId,
        reply: oneshot::Sender<Result<EffectInstance>>,
    },
    Remove {
        owner: OwnerId,
        key: String,
        cause: RemoveCause,
        quiet: bool,
        reply: oneshot::Sender<Option<EffectInstance>>,
    },
    Pause {
        owner: OwnerId,
        key: String,
        reply: oneshot::Sender<Option<EffectInstance>>,
    },
    Unpause {
        owner: OwnerId,
        key: String,
        reply: oneshot::Sender<Option<EffectInstance>>,
    },
    View {
        owner: OwnerId,
        reply: oneshot::Sender<Vec<EffectView>>,
    },
    Check {
        owner: OwnerId,
        base: f64,
        stat: String,
        quiet: bool,
        reply: oneshot::Sender<f64>,
    },
    Trigger {
        owner: OwnerId,
        tag: String,
        origin: Option<OwnerId>,
        target: Option<OwnerId>,
        payload: EventPayload,
        reply: oneshot::Sender<usize>,
    },
    Publish {
        name: String,
        source: Option<OwnerId>,
        payload: EventPayload,
        tags: Vec<String>,
        reply: oneshot::Sender<EventEnvelope>,
    },
    Attack {
        attacker: OwnerId,
        weapon: WeaponStats,
        defender: OwnerId,
        reply: oneshot::Sender<Result<AttackReport>>,
    },
    Injure {
        defender: OwnerId,
        raw: f64,
        attacker: Option<OwnerId>,
        element: Option<String>,
        reply: oneshot::Sender<Option<InjuryReport>>,
    },
    Advance {
        seconds: f64,
        reply: Option<oneshot::Sender<usize>>,
    },
    Now {
        reply: oneshot::Sender<f64>,
    },
    Save {
        reply: oneshot::Sender<Result<usize>>,
    },
    Load {
        reply: oneshot::Sender<Result<usize>>,
    },
    Shutdown,
}

/// Background task that processes world commands.
pub struct WorldWorker {
    world: World,
    repository: Option<Box<dyn AttributeStore>>,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<EventEnvelope>,
}

impl WorldWorker {
    /// Creates a new world worker.
    pub fn new(
        world: World,
        repository: Option<Box<dyn AttributeStore>>,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<EventEnvelope>,
    ) -> Self {
        Self {
            world,
            repository,
            command_rx,
            event_tx,
        }
    }

    /// Main worker loop.
    ///
    /// Runs until a shutdown command arrives or every sender is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            if matches!(cmd, Command::Shutdown) {
                debug!(target: "runtime::worker", "shutdown requested");
                break;
            }
            self.handle_command(cmd);
            self.forward_events();
        }
        info!(target: "runtime::worker", now = self.world.now(), "world worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Spawn {
                id,
                combatant,
                reply,
            } => {
                let result = self
                    .world
                    .spawn(id, combatant)
                    .map(|_| ())
                    .map_err(RuntimeError::from);
                let _ = reply.send(result);
            }
            Command::Despawn { id, reply } => {
                let _ = reply.send(self.world.despawn(id).is_some());
            }
            Command::QueryCombatant { id, reply } => {
                let _ = reply.send(self.world.combatant(id).cloned());
            }
            Command::Apply {
                owner,
                definition,
                source,
                options,
                reply,
            } => {
                let result = self
                    .world
                    .apply_effect(owner, &definition, source, options)
                    .map_err(RuntimeError::from);
                let _ = reply.send(result);
            }
            Command::ApplyPerk {
                owner,
                definition,
                slot,
                reply,
            } => {
                let result = self
                    .world
                    .apply_perk(owner, &definition, slot)
                    .map_err(RuntimeError::from);
                let _ = reply.send(result);
            }
            Command::Remove {
                owner,
                key,
                cause,
                quiet,
                reply,
            } => {
                let _ = reply.send(self.world.remove_effect(owner, &key, cause, quiet));
            }
            Command::Pause { owner, key, reply } => {
                let _ = reply.send(self.world.pause_effect(owner, &key));
            }
            Command::Unpause { owner, key, reply } => {
                let _ = reply.send(self.world.unpause_effect(owner, &key));
            }
            Command::View { owner, reply } => {
                let _ = reply.send(self.world.view_effects(owner));
            }
            Command::Check {
                owner,
                base,
                stat,
                quiet,
                reply,
            } => {
                let _ = reply.send(self.world.check(owner, base, &stat, quiet));
            }
            Command::Trigger {
                owner,
                tag,
                origin,
                target,
                payload,
                reply,
            } => {
                let _ = reply.send(self.world.trigger(owner, &tag, origin, target, payload));
            }
            Command::Publish {
                name,
                source,
                payload,
                tags,
                reply,
            } => {
                let _ = reply.send(self.world.publish(&name, source, payload, tags));
            }
            Command::Attack {
                attacker,
                weapon,
                defender,
                reply,
            } => {
                let result = self
                    .world
                    .weapon_attack(attacker, &weapon, defender)
                    .map_err(RuntimeError::from);
                let _ = reply.send(result);
            }
            Command::Injure {
                defender,
                raw,
                attacker,
                element,
                reply,
            } => {
                let report = self
                    .world
                    .injure(defender, raw, attacker, element.as_deref());
                let _ = reply.send(report);
            }
            Command::Advance { seconds, reply } => {
                let fired = self.world.advance(seconds);
                if let Some(reply) = reply {
                    let _ = reply.send(fired);
                }
            }
            Command::Now { reply } => {
                let _ = reply.send(self.world.now());
            }
            Command::Save { reply } => {
                let _ = reply.send(self.save());
            }
            Command::Load { reply } => {
                let _ = reply.send(self.load());
            }
            Command::Shutdown => {}
        }
    }

    /// Publishes events recorded by the world since the last command.
    fn forward_events(&mut self) {
        for envelope in self.world.bus_mut().take_history() {
            if self.event_tx.send(envelope).is_err() {
                tracing::trace!(target: "runtime::worker", "No subscribers for world events");
            }
        }
    }

    /// Persists every owner plus the timer table. Returns the owner count.
    fn save(&mut self) -> Result<usize> {
        let repository = self
            .repository
            .as_mut()
            .ok_or(RuntimeError::MissingRepository)?;

        let owners: Vec<OwnerId> = self.world.owner_ids().collect();
        for &owner in &owners {
            self.world.persist_owner(owner, &mut **repository)?;
        }
        let index = bincode::serialize(&owners)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        repository.set(OwnerId::WORLD, OWNERS_ATTRIBUTE, index)?;
        repository.set(OwnerId::WORLD, TIMERS_ATTRIBUTE, self.world.encode_timers()?)?;
        repository.flush()?;

        info!(target: "runtime::worker", owners = owners.len(), now = self.world.now(), "saved world");
        Ok(owners.len())
    }

    /// Restores every saved owner plus the timer table. Returns the owner
    /// count.
    fn load(&mut self) -> Result<usize> {
        let repository = self
            .repository
            .as_ref()
            .ok_or(RuntimeError::MissingRepository)?;

        let Some(index) = repository.get(OwnerId::WORLD, OWNERS_ATTRIBUTE)? else {
            warn!(target: "runtime::worker", "no saved world found");
            return Ok(0);
        };
        let owners: Vec<OwnerId> = bincode::deserialize(&index)
            .map_err(|e| RepositoryError::CorruptedData(e.to_string()))?;

        let mut restored = 0;
        for owner in owners {
            if self.world.restore_owner(owner, &**repository)? {
                restored += 1;
            }
        }
        if let Some(timers) = repository.get(OwnerId::WORLD, TIMERS_ATTRIBUTE)? {
            self.world.restore_timers(&timers)?;
        }

        info!(target: "runtime::worker", owners = restored, now = self.world.now(), "loaded world");
        Ok(restored)
    }
}
