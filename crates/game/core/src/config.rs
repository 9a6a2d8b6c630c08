/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Slack added after an effect's duration before its expiry sweep fires,
    /// so the sweep observes `now - start > duration`.
    pub expiry_epsilon: f64,

    /// Seconds a dead combatant waits before the revive timer fires.
    pub revive_delay: f64,

    /// Element reported for injuries that do not name one.
    pub default_element: String,

    /// Number of published event envelopes retained by the bus.
    pub event_history: usize,
}

impl EngineConfig {
    pub const DEFAULT_EXPIRY_EPSILON: f64 = 0.1;
    pub const DEFAULT_REVIVE_DELAY: f64 = 30.0;
    pub const DEFAULT_ELEMENT: &'static str = "neutral";
    pub const DEFAULT_EVENT_HISTORY: usize = 256;

    pub fn new() -> Self {
        Self {
            expiry_epsilon: Self::DEFAULT_EXPIRY_EPSILON,
            revive_delay: Self::DEFAULT_REVIVE_DELAY,
            default_element: Self::DEFAULT_ELEMENT.to_owned(),
            event_history: Self::DEFAULT_EVENT_HISTORY,
        }
    }

    pub fn with_revive_delay(revive_delay: f64) -> Self {
        Self {
            revive_delay,
            ..Self::new()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
