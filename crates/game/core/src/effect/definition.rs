//! Immutable effect templates and their validation.

use std::collections::BTreeSet;

use bitflags::bitflags;

use crate::error::{ErrorSeverity, GameError};
use crate::state::OwnerId;

/// Duration template meaning "never expires".
pub const INFINITE_DURATION: f64 = -1.0;

bitflags! {
    /// Application and lifecycle semantics of an effect definition.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EffectFlags: u8 {
        /// Reapplying resets the start time.
        const REFRESH = 1 << 0;
        /// Reapplying adds stacks up to `max_stacks`.
        const STACKING = 1 << 1;
        /// One instance per owner regardless of source.
        const UNIQUE = 1 << 2;
        /// Combat effect, cleared when the owner dies.
        const COMBAT = 1 << 3;
        /// Survives death even when flagged `COMBAT`.
        const KEEP_ON_DEATH = 1 << 4;
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EffectFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EffectFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

/// How a modifier combines with the queried base value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ModifierOp {
    /// Summed into the flat bonus.
    Add,
    /// Summed into the single multiplicative rate.
    Multiply,
}

/// One `(stat, operation, magnitude, per-stack magnitude)` rule.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub stat: String,
    pub op: ModifierOp,
    pub base: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub per_stack: f64,
}

impl Modifier {
    pub fn add(stat: impl Into<String>, base: f64, per_stack: f64) -> Self {
        Self {
            stat: stat.into(),
            op: ModifierOp::Add,
            base,
            per_stack,
        }
    }

    pub fn multiply(stat: impl Into<String>, base: f64, per_stack: f64) -> Self {
        Self {
            stat: stat.into(),
            op: ModifierOp::Multiply,
            base,
            per_stack,
        }
    }

    /// Magnitude at the given stack count: `base + (stacks - 1) * per_stack`.
    pub fn contribution(&self, stacks: u32) -> f64 {
        self.base + f64::from(stacks.saturating_sub(1)) * self.per_stack
    }
}

/// Immutable, externally authored template for an effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDefinition {
    pub key: String,
    /// Display name (presentation only).
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flavor: String,
    /// Seconds, or [`INFINITE_DURATION`].
    pub duration: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_stacks: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: EffectFlags,
    /// Seconds between ticks; `0` disables ticking.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_rate: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<Modifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger_tags: BTreeSet<String>,
    /// Hook implementation id resolved at registration.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hooks: Option<String>,
}

impl EffectDefinition {
    /// Creates a plain definition: not stacking, not refreshing, not unique,
    /// not ticking, no modifiers.
    pub fn new(key: impl Into<String>, name: impl Into<String>, duration: f64) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            flavor: String::new(),
            duration,
            max_stacks: None,
            flags: EffectFlags::empty(),
            tick_rate: 0.0,
            modifiers: Vec::new(),
            trigger_tags: BTreeSet::new(),
            hooks: None,
        }
    }

    #[must_use]
    pub fn flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = flavor.into();
        self
    }

    #[must_use]
    pub fn stacking(mut self, max_stacks: u32) -> Self {
        self.flags |= EffectFlags::STACKING;
        self.max_stacks = Some(max_stacks);
        self
    }

    #[must_use]
    pub fn refresh(mut self) -> Self {
        self.flags |= EffectFlags::REFRESH;
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.flags |= EffectFlags::UNIQUE;
        self
    }

    #[must_use]
    pub fn combat(mut self) -> Self {
        self.flags |= EffectFlags::COMBAT;
        self
    }

    #[must_use]
    pub fn keep_on_death(mut self) -> Self {
        self.flags |= EffectFlags::KEEP_ON_DEATH;
        self
    }

    #[must_use]
    pub fn ticking(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn trigger_on(mut self, tag: impl Into<String>) -> Self {
        self.trigger_tags.insert(tag.into());
        self
    }

    #[must_use]
    pub fn hooks(mut self, hooks: impl Into<String>) -> Self {
        self.hooks = Some(hooks.into());
        self
    }

    pub fn is_unique(&self) -> bool {
        self.flags.contains(EffectFlags::UNIQUE)
    }

    pub fn is_stacking(&self) -> bool {
        self.flags.contains(EffectFlags::STACKING)
    }

    pub fn is_refresh(&self) -> bool {
        self.flags.contains(EffectFlags::REFRESH)
    }

    pub fn is_ticking(&self) -> bool {
        self.tick_rate > 0.0
    }

    pub fn is_infinite(&self) -> bool {
        self.duration < 0.0
    }

    /// Whether death clears instances of this definition.
    pub fn clears_on_death(&self) -> bool {
        self.flags.contains(EffectFlags::COMBAT) && !self.flags.contains(EffectFlags::KEEP_ON_DEATH)
    }

    /// Effective stack cap (non-stacking definitions cap at one).
    pub fn stack_cap(&self) -> u32 {
        if self.is_stacking() {
            self.max_stacks.unwrap_or(1).max(1)
        } else {
            1
        }
    }

    /// Returns true if any trigger tag appears in `tags`.
    pub fn listens_to<'a>(&self, mut tags: impl Iterator<Item = &'a str>) -> bool {
        tags.any(|tag| self.trigger_tags.contains(tag))
    }

    /// Returns the modifiers that target `stat`.
    pub fn modifiers_for<'a>(&'a self, stat: &'a str) -> impl Iterator<Item = &'a Modifier> + 'a {
        self.modifiers.iter().filter(move |m| m.stat == stat)
    }

    /// Store key for an instance applied by `source`.
    ///
    /// Unique definitions collapse every source onto the definition key;
    /// others get one instance per source.
    pub fn instance_key(&self, source: OwnerId) -> String {
        if self.is_unique() {
            self.key.clone()
        } else {
            format!("{}#{}", self.key, source.0)
        }
    }

    /// Checks the definition for authoring mistakes.
    ///
    /// Called at registration/content load so bad data fails fast instead of
    /// misbehaving at apply time.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.key.trim().is_empty() {
            return Err(DefinitionError::EmptyKey);
        }
        if !self.duration.is_finite() || (self.duration < 0.0 && self.duration != INFINITE_DURATION)
        {
            return Err(DefinitionError::InvalidDuration {
                key: self.key.clone(),
                duration: self.duration,
            });
        }
        if self.is_stacking() {
            match self.max_stacks {
                None => {
                    return Err(DefinitionError::StackingWithoutCap {
                        key: self.key.clone(),
                    });
                }
                Some(0) => {
                    return Err(DefinitionError::ZeroStackCap {
                        key: self.key.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        if !self.tick_rate.is_finite() || self.tick_rate < 0.0 {
            return Err(DefinitionError::InvalidTickRate {
                key: self.key.clone(),
                tick_rate: self.tick_rate,
            });
        }
        if let Some(modifier) = self
            .modifiers
            .iter()
            .find(|m| !m.base.is_finite() || !m.per_stack.is_finite())
        {
            return Err(DefinitionError::NonFiniteModifier {
                key: self.key.clone(),
                stat: modifier.stat.clone(),
            });
        }
        Ok(())
    }
}

/// Authoring errors detected at content-load time.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("effect definition has an empty key")]
    EmptyKey,

    #[error("effect {key} has invalid duration {duration}")]
    InvalidDuration { key: String, duration: f64 },

    #[error("effect {key} is stacking but declares no max_stacks")]
    StackingWithoutCap { key: String },

    #[error("effect {key} declares max_stacks = 0")]
    ZeroStackCap { key: String },

    #[error("effect {key} has invalid tick rate {tick_rate}")]
    InvalidTickRate { key: String, tick_rate: f64 },

    #[error("effect {key} has a non-finite modifier on {stat}")]
    NonFiniteModifier { key: String, stat: String },

    #[error("effect {key} is already registered")]
    DuplicateKey { key: String },

    #[error("effect {key} references unknown hooks {hooks}")]
    UnknownHooks { key: String, hooks: String },
}

impl GameError for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyKey => "EMPTY_KEY",
            Self::InvalidDuration { .. } => "INVALID_DURATION",
            Self::StackingWithoutCap { .. } => "STACKING_WITHOUT_CAP",
            Self::ZeroStackCap { .. } => "ZERO_STACK_CAP",
            Self::InvalidTickRate { .. } => "INVALID_TICK_RATE",
            Self::NonFiniteModifier { .. } => "NON_FINITE_MODIFIER",
            Self::DuplicateKey { .. } => "DUPLICATE_KEY",
            Self::UnknownHooks { .. } => "UNKNOWN_HOOKS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contribution_scales_with_extra_stacks() {
        let m = Modifier::add("accuracy", 10.0, 5.0);
        assert_eq!(m.contribution(1), 10.0);
        assert_eq!(m.contribution(3), 20.0);
        assert_eq!(m.contribution(0), 10.0);
    }

    #[test]
    fn instance_key_depends_on_uniqueness() {
        let shared = EffectDefinition::new("bleed", "Bleed", 5.0);
        assert_eq!(shared.instance_key(OwnerId(4)), "bleed#4");

        let unique = EffectDefinition::new("rage", "Rage", 5.0).unique();
        assert_eq!(unique.instance_key(OwnerId(4)), "rage");
    }

    #[test]
    fn stacking_requires_cap() {
        let mut def = EffectDefinition::new("focus", "Focus", 10.0);
        def.flags |= EffectFlags::STACKING;
        assert!(matches!(
            def.validate(),
            Err(DefinitionError::StackingWithoutCap { .. })
        ));

        def.max_stacks = Some(0);
        assert!(matches!(def.validate(), Err(DefinitionError::ZeroStackCap { .. })));

        def.max_stacks = Some(3);
        assert!(def.validate().is_ok());
        assert_eq!(def.stack_cap(), 3);
    }

    #[test]
    fn rejects_bad_durations_and_tick_rates() {
        assert!(EffectDefinition::new("a", "A", INFINITE_DURATION).validate().is_ok());
        assert!(matches!(
            EffectDefinition::new("a", "A", -2.0).validate(),
            Err(DefinitionError::InvalidDuration { .. })
        ));
        assert!(matches!(
            EffectDefinition::new("a", "A", 1.0).ticking(-1.0).validate(),
            Err(DefinitionError::InvalidTickRate { .. })
        ));
        assert!(matches!(
            EffectDefinition::new("  ", "A", 1.0).validate(),
            Err(DefinitionError::EmptyKey)
        ));
    }

    #[test]
    fn death_clearing_respects_exemption() {
        let plain = EffectDefinition::new("a", "A", 1.0);
        assert!(!plain.clears_on_death());
        assert!(plain.clone().combat().clears_on_death());
        assert!(!plain.combat().keep_on_death().clears_on_death());
    }

    #[test]
    fn listens_to_any_matching_tag() {
        let def = EffectDefinition::new("riposte", "Riposte", 1.0).trigger_on("hit");
        assert!(def.listens_to(["ranged", "hit"].into_iter()));
        assert!(!def.listens_to(["crit"].into_iter()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_definition_uses_flag_names_and_defaults() {
        let json = r#"{
            "key": "ward",
            "name": "Ward",
            "duration": 20.0,
            "max_stacks": 3,
            "flags": "UNIQUE | STACKING",
            "modifiers": [{ "stat": "injury", "op": "Multiply", "base": -0.1 }]
        }"#;
        let def: EffectDefinition = serde_json::from_str(json).unwrap();
        assert!(def.is_unique() && def.is_stacking());
        assert_eq!(def.modifiers[0].per_stack, 0.0);
        assert!(def.trigger_tags.is_empty());
        assert!(def.validate().is_ok());

        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value["flags"], "STACKING | UNIQUE");
    }
}
