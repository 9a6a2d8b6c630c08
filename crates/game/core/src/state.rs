//! Combatant identity and life state.

use std::fmt;

/// Unique identifier for anything that can own effects or apply them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnerId(pub u32);

impl OwnerId {
    /// Reserved identifier for effects applied by the environment rather than
    /// by another combatant (traps, scripted content).
    pub const WORLD: Self = Self(u32::MAX);

    /// Returns true if this id represents the environment.
    #[inline]
    pub const fn is_world(self) -> bool {
        self.0 == Self::WORLD.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Life state of a combatant.
///
/// The only transitions are `Alive -> Dead` (hit points reach zero) and
/// `Dead -> Alive` (the revive timer elapses).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
}

/// Combat-relevant state of a single owner.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    /// Raw evasion bonus used as the defender side of an opposed roll.
    pub evasion: f64,
    pub life: LifeState,
    /// Number of deaths so far. Stamps the revive timer of each death.
    #[cfg_attr(feature = "serde", serde(default))]
    pub deaths: u64,
}

impl Combatant {
    /// Creates a living combatant at full health with no evasion.
    pub fn new(name: impl Into<String>, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            hp: max_hp,
            max_hp,
            evasion: 0.0,
            life: LifeState::Alive,
            deaths: 0,
        }
    }

    /// Sets the evasion bonus (builder pattern).
    #[must_use]
    pub fn with_evasion(mut self, evasion: f64) -> Self {
        self.evasion = evasion;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    pub fn is_dead(&self) -> bool {
        self.life == LifeState::Dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_combatant_is_alive_at_full_health() {
        let c = Combatant::new("Sentry", 40).with_evasion(12.5);
        assert!(c.is_alive());
        assert_eq!(c.hp, 40);
        assert_eq!(c.max_hp, 40);
        assert_eq!(c.evasion, 12.5);
    }

    #[test]
    fn life_state_labels() {
        assert_eq!(LifeState::Alive.to_string(), "alive");
        assert_eq!(LifeState::Dead.as_ref(), "dead");
    }

    #[test]
    fn world_owner_is_reserved() {
        assert!(OwnerId::WORLD.is_world());
        assert!(!OwnerId(3).is_world());
        assert_eq!(OwnerId(3).to_string(), "#3");
    }
}
