//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers one async method per
//! world operation. Commands queue in order, so calls made from one task
//! observe each other's effects.
use tokio::sync::{broadcast, mpsc, oneshot};

use effect_core::{
    ApplyOptions, AttackReport, Combatant, EffectInstance, EffectView, EventEnvelope,
    EventPayload, InjuryReport, OwnerId, RemoveCause, SentMessage, WeaponStats,
};

use super::errors::{Result, RuntimeError};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime.
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<EventEnvelope>,
    message_tx: broadcast::Sender<SentMessage>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<EventEnvelope>,
        message_tx: broadcast::Sender<SentMessage>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
            message_tx,
        }
    }

    /// Sends a command built around a fresh reply channel and awaits the
    /// reply.
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Adds a combatant to the world.
    pub async fn spawn(&self, id: OwnerId, combatant: Combatant) -> Result<()> {
        self.request(|reply| Command::Spawn {
            id,
            combatant,
            reply,
        })
        .await?
    }

    /// Removes a combatant and its effects. Returns false if it was absent.
    pub async fn despawn(&self, id: OwnerId) -> Result<bool> {
        self.request(|reply| Command::Despawn { id, reply }).await
    }

    /// Returns a copy of a combatant's current state.
    pub async fn combatant(&self, id: OwnerId) -> Result<Option<Combatant>> {
        self.request(|reply| Command::QueryCombatant { id, reply })
            .await
    }

    pub async fn apply_effect(
        &self,
        owner: OwnerId,
        definition: impl Into<String>,
        source: OwnerId,
        options: ApplyOptions,
    ) -> Result<EffectInstance> {
        let definition = definition.into();
        self.request(|reply| Command::Apply {
            owner,
            definition,
            source,
            options,
            reply,
        })
        .await?
    }

    /// Applies a permanent effect keyed to a perk slot.
    pub async fn apply_perk(
        &self,
        owner: OwnerId,
        definition: impl Into<String>,
        slot: OwnerId,
    ) -> Result<EffectInstance> {
        let definition = definition.into();
        self.request(|reply| Command::ApplyPerk {
            owner,
            definition,
            slot,
            reply,
        })
        .await?
    }

    pub async fn remove_effect(
        &self,
        owner: OwnerId,
        key: impl Into<String>,
        cause: RemoveCause,
        quiet: bool,
    ) -> Result<Option<EffectInstance>> {
        let key = key.into();
        self.request(|reply| Command::Remove {
            owner,
            key,
            cause,
            quiet,
            reply,
        })
        .await
    }

    pub async fn pause_effect(
        &self,
        owner: OwnerId,
        key: impl Into<String>,
    ) -> Result<Option<EffectInstance>> {
        let key = key.into();
        self.request(|reply| Command::Pause { owner, key, reply })
            .await
    }

    pub async fn unpause_effect(
        &self,
        owner: OwnerId,
        key: impl Into<String>,
    ) -> Result<Option<EffectInstance>> {
        let key = key.into();
        self.request(|reply| Command::Unpause { owner, key, reply })
            .await
    }

    /// Lists an owner's live effects after sweeping expired ones.
    pub async fn view_effects(&self, owner: OwnerId) -> Result<Vec<EffectView>> {
        self.request(|reply| Command::View { owner, reply }).await
    }

    /// Queries a stat through the owner's modifiers.
    pub async fn check(
        &self,
        owner: OwnerId,
        base: f64,
        stat: impl Into<String>,
        quiet: bool,
    ) -> Result<f64> {
        let stat = stat.into();
        self.request(|reply| Command::Check {
            owner,
            base,
            stat,
            quiet,
            reply,
        })
        .await
    }

    /// Fires a trigger tag on one owner. Returns how many effects reacted.
    pub async fn trigger(
        &self,
        owner: OwnerId,
        tag: impl Into<String>,
        origin: Option<OwnerId>,
        target: Option<OwnerId>,
        payload: EventPayload,
    ) -> Result<usize> {
        let tag = tag.into();
        self.request(|reply| Command::Trigger {
            owner,
            tag,
            origin,
            target,
            payload,
            reply,
        })
        .await
    }

    /// Publishes a named event to every subscribed owner.
    pub async fn publish(
        &self,
        name: impl Into<String>,
        source: Option<OwnerId>,
        payload: EventPayload,
        tags: Vec<String>,
    ) -> Result<EventEnvelope> {
        let name = name.into();
        self.request(|reply| Command::Publish {
            name,
            source,
            payload,
            tags,
            reply,
        })
        .await
    }

    /// Resolves a full weapon attack.
    pub async fn weapon_attack(
        &self,
        attacker: OwnerId,
        weapon: WeaponStats,
        defender: OwnerId,
    ) -> Result<AttackReport> {
        self.request(|reply| Command::Attack {
            attacker,
            weapon,
            defender,
            reply,
        })
        .await?
    }

    pub async fn injure(
        &self,
        defender: OwnerId,
        raw: f64,
        attacker: Option<OwnerId>,
        element: Option<String>,
    ) -> Result<Option<InjuryReport>> {
        self.request(|reply| Command::Injure {
            defender,
            raw,
            attacker,
            element,
            reply,
        })
        .await
    }

    /// Advances virtual time. Returns the number of timers fired.
    pub async fn advance(&self, seconds: f64) -> Result<usize> {
        self.request(|reply| Command::Advance {
            seconds,
            reply: Some(reply),
        })
        .await
    }

    /// Current virtual time.
    pub async fn now(&self) -> Result<f64> {
        self.request(|reply| Command::Now { reply }).await
    }

    /// Persists every owner and the timer table. Returns the owner count.
    pub async fn save(&self) -> Result<usize> {
        self.request(|reply| Command::Save { reply }).await?
    }

    /// Restores owners and timers saved by [`save`](Self::save).
    pub async fn load(&self) -> Result<usize> {
        self.request(|reply| Command::Load { reply }).await?
    }

    /// Asks the world worker to stop after the commands already queued.
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Subscribes to every event the world publishes.
    pub fn subscribe_events(&self) -> broadcast::Receiver<EventEnvelope> {
        self.event_tx.subscribe()
    }

    /// Subscribes to player-facing notices (death, revive, hook messages).
    pub fn subscribe_messages(&self) -> broadcast::Receiver<SentMessage> {
        self.message_tx.subscribe()
    }
}
