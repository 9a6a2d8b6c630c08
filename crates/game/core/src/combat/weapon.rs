//! Weapon parameters consumed by the resolver.

/// Static stats of the weapon used for an attack.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponStats {
    pub name: String,
    /// Base damage of a single shot.
    pub damage: f64,
    /// Base accuracy bonus before `accuracy` modifiers.
    pub accuracy: f64,
    /// Crit multiplier before `precision` modifiers. Also the crit threshold.
    pub crit_mult: f64,
    /// Independent rolls per attack.
    pub shots: u32,
    /// Element reported on the resulting injury.
    pub element: String,
}

impl WeaponStats {
    /// A single-shot neutral weapon with a 2x crit multiplier.
    pub fn new(name: impl Into<String>, damage: f64, accuracy: f64) -> Self {
        Self {
            name: name.into(),
            damage,
            accuracy,
            crit_mult: 2.0,
            shots: 1,
            element: crate::EngineConfig::DEFAULT_ELEMENT.to_owned(),
        }
    }

    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    #[must_use]
    pub fn with_crit_mult(mut self, crit_mult: f64) -> Self {
        self.crit_mult = crit_mult;
        self
    }

    #[must_use]
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = element.into();
        self
    }
}
