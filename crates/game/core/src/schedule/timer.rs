//! Timer records kept by a [`Scheduler`](super::Scheduler).

use std::fmt;

use crate::state::OwnerId;

/// Handle returned when a timer is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer:{}", self.0)
    }
}

/// What a timer does when it fires.
///
/// Payloads name their target by id and key only. Firing re-validates against
/// live state, so a payload can never hold a stale reference.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerPayload {
    /// Sweep expired effects on `owner`; scheduled for the effect under `key`.
    Expire { owner: OwnerId, key: String },
    /// Periodic tick of the effect under `key`, valid only for `generation`.
    Tick {
        owner: OwnerId,
        key: String,
        generation: u64,
    },
    /// Bring a dead combatant back, valid only while `death` is its latest
    /// death.
    Revive { owner: OwnerId, death: u64 },
}

impl TimerPayload {
    pub fn owner(&self) -> OwnerId {
        match self {
            Self::Expire { owner, .. } | Self::Tick { owner, .. } | Self::Revive { owner, .. } => *owner,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Expire { .. } => "expire",
            Self::Tick { .. } => "tick",
            Self::Revive { .. } => "revive",
        }
    }
}

/// A scheduled callback.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timer {
    pub id: TimerId,
    /// Absolute due time in seconds.
    pub due: f64,
    pub payload: TimerPayload,
    /// Survives a restart through [`TimerSnapshot`].
    pub persistent: bool,
}

/// Durable form of a timer table: the clock plus every persistent timer.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerSnapshot {
    pub now: f64,
    pub next_id: u64,
    /// Next tick generation of the world that took the snapshot. Tick timers
    /// in `timers` all carry a lower one. Zero when unknown.
    pub next_generation: u64,
    pub timers: Vec<Timer>,
}
