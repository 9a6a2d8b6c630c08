//! Published event records.

use std::collections::BTreeSet;
use std::fmt;

use crate::combat::{CombatContext, InjuryReport};
use crate::state::OwnerId;

/// Monotonic identifier assigned by the bus at publish time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event:{}", self.0)
    }
}

/// Typed event payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EventPayload {
    #[default]
    Empty,
    /// An attack in progress (hit, crit).
    Combat(CombatContext),
    /// Damage that landed on a defender.
    Injury(InjuryReport),
    Death {
        victim: OwnerId,
        killer: Option<OwnerId>,
    },
    Revive {
        owner: OwnerId,
    },
}

impl EventPayload {
    /// The owner the payload is about, if any.
    pub fn target(&self) -> Option<OwnerId> {
        match self {
            Self::Empty => None,
            Self::Combat(ctx) => Some(ctx.defender),
            Self::Injury(report) => Some(report.defender),
            Self::Death { victim, .. } => Some(*victim),
            Self::Revive { owner } => Some(*owner),
        }
    }
}

/// A published event as recorded by the bus.
#[derive(Clone, Debug, PartialEq)]
pub struct EventEnvelope {
    pub id: EventId,
    pub name: String,
    pub source: Option<OwnerId>,
    /// World time of publication.
    pub timestamp: f64,
    pub payload: EventPayload,
    pub tags: BTreeSet<String>,
}

impl EventEnvelope {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}
