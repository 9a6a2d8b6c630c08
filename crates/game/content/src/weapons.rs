//! Named weapon tables.

use std::collections::BTreeMap;

use effect_core::WeaponStats;

/// Problems found in a weapon entry.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WeaponError {
    #[error("weapon name must not be empty")]
    EmptyName,

    #[error("weapon '{name}' must fire at least one shot")]
    NoShots { name: String },

    #[error("weapon '{name}' has a non-finite {field}")]
    NonFinite { name: String, field: &'static str },

    #[error("weapon '{name}' is defined twice")]
    Duplicate { name: String },
}

/// Weapons keyed by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeaponCatalog {
    weapons: BTreeMap<String, WeaponStats>,
}

impl WeaponCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and adds a weapon.
    pub fn insert(&mut self, weapon: WeaponStats) -> Result<(), WeaponError> {
        validate(&weapon)?;
        if self.weapons.contains_key(&weapon.name) {
            return Err(WeaponError::Duplicate { name: weapon.name });
        }
        self.weapons.insert(weapon.name.clone(), weapon);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&WeaponStats> {
        self.weapons.get(name)
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// Weapon names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.weapons.keys().map(String::as_str)
    }
}

fn validate(weapon: &WeaponStats) -> Result<(), WeaponError> {
    if weapon.name.trim().is_empty() {
        return Err(WeaponError::EmptyName);
    }
    if weapon.shots == 0 {
        return Err(WeaponError::NoShots {
            name: weapon.name.clone(),
        });
    }
    for (field, value) in [
        ("damage", weapon.damage),
        ("accuracy", weapon.accuracy),
        ("crit_mult", weapon.crit_mult),
    ] {
        if !value.is_finite() {
            return Err(WeaponError::NonFinite {
                name: weapon.name.clone(),
                field,
            });
        }
    }
    Ok(())
}
