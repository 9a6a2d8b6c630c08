//! Durable owner state and timer tables.
//!
//! Owners persist as two bincode-encoded attributes in an injected
//! [`AttributeStore`]: the [`Combatant`] and its [`ModifierStore`]. The
//! scheduler persists separately as a [`TimerSnapshot`]; restoring both after
//! a restart resumes every expiry, tick chain and pending revive.

use tracing::debug;

use super::{Owner, World, WorldError};
use crate::effect::ModifierStore;
use crate::env::AttributeStore;
use crate::schedule::{TimerPayload, TimerSnapshot};
use crate::state::{Combatant, OwnerId};

/// Attribute key holding an owner's encoded [`ModifierStore`].
pub const EFFECTS_ATTRIBUTE: &str = "effects";

/// Attribute key holding an owner's encoded [`Combatant`].
pub const COMBATANT_ATTRIBUTE: &str = "combatant";

fn encode<T: serde::Serialize>(what: &'static str, value: &T) -> Result<Vec<u8>, WorldError> {
    bincode::serialize(value).map_err(|err| WorldError::Encode {
        what,
        reason: err.to_string(),
    })
}

fn decode<T: serde::de::DeserializeOwned>(
    what: &'static str,
    owner: OwnerId,
    bytes: &[u8],
) -> Result<T, WorldError> {
    bincode::deserialize(bytes).map_err(|err| WorldError::Decode {
        what,
        owner,
        reason: err.to_string(),
    })
}

impl World {
    /// Writes `owner`'s combatant and effects to `store`.
    pub fn persist_owner(
        &self,
        owner: OwnerId,
        store: &mut dyn AttributeStore,
    ) -> Result<(), WorldError> {
        let entry = self
            .owners
            .get(&owner)
            .ok_or(WorldError::UnknownOwner(owner))?;
        store.set(
            owner,
            COMBATANT_ATTRIBUTE,
            encode(COMBATANT_ATTRIBUTE, &entry.combatant)?,
        )?;
        store.set(
            owner,
            EFFECTS_ATTRIBUTE,
            encode(EFFECTS_ATTRIBUTE, &entry.effects)?,
        )?;
        debug!(%owner, effects = entry.effects.len(), "persisted owner");
        Ok(())
    }

    /// Loads `owner` from `store`, replacing any live state for that id.
    ///
    /// Instances come back as stored, with no hooks called. Returns
    /// `Ok(false)` when nothing was persisted for the owner.
    pub fn restore_owner(
        &mut self,
        owner: OwnerId,
        store: &dyn AttributeStore,
    ) -> Result<bool, WorldError> {
        let Some(combatant_bytes) = store.get(owner, COMBATANT_ATTRIBUTE)? else {
            return Ok(false);
        };
        let combatant: Combatant = decode(COMBATANT_ATTRIBUTE, owner, &combatant_bytes)?;

        let mut effects = ModifierStore::new(owner);
        if let Some(bytes) = store.get(owner, EFFECTS_ATTRIBUTE)? {
            let stored: ModifierStore = decode(EFFECTS_ATTRIBUTE, owner, &bytes)?;
            for instance in stored.iter() {
                if !self.catalog.contains(&instance.definition) {
                    debug!(%owner, definition = %instance.definition, "dropped instance of unknown definition");
                    continue;
                }
                self.generations.skip_past(instance.tick_generation);
                effects.insert(instance.clone());
            }
        }

        debug!(%owner, effects = effects.len(), "restored owner");
        self.owners.insert(owner, Owner { combatant, effects });
        self.bus.subscribe(owner);
        Ok(true)
    }

    /// Captures the clock, every persistent timer and the next tick
    /// generation.
    pub fn timer_snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            next_generation: self.generations.peek(),
            ..self.scheduler.snapshot()
        }
    }

    /// Encodes [`timer_snapshot`](Self::timer_snapshot) with bincode.
    pub fn encode_timers(&self) -> Result<Vec<u8>, WorldError> {
        encode("timers", &self.timer_snapshot())
    }

    /// Rehydrates timers encoded by [`encode_timers`](Self::encode_timers).
    ///
    /// New instances draw tick generations above every restored tick timer.
    /// Returns the number of timers restored.
    pub fn restore_timers(&mut self, bytes: &[u8]) -> Result<usize, WorldError> {
        let snapshot: TimerSnapshot = decode("timers", OwnerId::WORLD, bytes)?;
        let count = snapshot.timers.len();
        self.generations
            .skip_past(snapshot.next_generation.saturating_sub(1));
        for timer in &snapshot.timers {
            if let TimerPayload::Tick { generation, .. } = timer.payload {
                self.generations.skip_past(generation);
            }
        }
        self.scheduler.restore(snapshot);
        debug!(count, now = self.now(), "restored timers");
        Ok(count)
    }
}
