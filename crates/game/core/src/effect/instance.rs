//! Runtime occurrences of an effect on an owner.

use crate::state::OwnerId;

/// One applied occurrence of an [`EffectDefinition`](super::EffectDefinition).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectInstance {
    /// Store key (definition key, plus source for non-unique definitions).
    pub key: String,
    /// Key of the definition this instance was applied from.
    pub definition: String,
    pub owner: OwnerId,
    /// Who applied it; may equal `owner`.
    pub source: OwnerId,
    pub stacks: u32,
    /// Time the current lifetime started.
    pub start: f64,
    /// Seconds of lifetime from `start`, negative for infinite.
    ///
    /// While paused this holds the frozen remaining time.
    pub duration: f64,
    pub last_tick: Option<f64>,
    pub paused: bool,
    /// Identifies the live tick chain; older chains are stale.
    pub tick_generation: u64,
}

impl EffectInstance {
    pub fn is_infinite(&self) -> bool {
        self.duration < 0.0
    }

    /// Seconds left before expiry, `None` for infinite instances.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        if self.is_infinite() {
            None
        } else if self.paused {
            Some(self.duration)
        } else {
            Some((self.start + self.duration - now).max(0.0))
        }
    }

    /// Returns true if the lifetime has run out at `now`.
    ///
    /// Paused and infinite instances never expire.
    pub fn is_expired(&self, now: f64) -> bool {
        !self.paused && !self.is_infinite() && now - self.start > self.duration
    }

    /// Seconds since the current lifetime started.
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(start: f64, duration: f64) -> EffectInstance {
        EffectInstance {
            key: "a".into(),
            definition: "a".into(),
            owner: OwnerId(1),
            source: OwnerId(1),
            stacks: 1,
            start,
            duration,
            last_tick: None,
            paused: false,
            tick_generation: 0,
        }
    }

    #[test]
    fn expiry_is_strictly_after_duration() {
        let inst = instance(10.0, 5.0);
        assert!(!inst.is_expired(15.0));
        assert!(inst.is_expired(15.01));
        assert_eq!(inst.remaining(12.0), Some(3.0));
        assert_eq!(inst.remaining(20.0), Some(0.0));
    }

    #[test]
    fn infinite_and_paused_never_expire() {
        let inf = instance(0.0, -1.0);
        assert!(!inf.is_expired(1e9));
        assert_eq!(inf.remaining(5.0), None);

        let mut paused = instance(0.0, 4.0);
        paused.paused = true;
        assert!(!paused.is_expired(100.0));
        assert_eq!(paused.remaining(100.0), Some(4.0));
    }
}
