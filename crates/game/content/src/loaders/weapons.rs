//! Weapon table loader.

use std::path::Path;

use effect_core::WeaponStats;
use serde::{Deserialize, Serialize};

use crate::WeaponCatalog;
use crate::loaders::{LoadResult, read_file};

/// Weapon table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponTable {
    pub weapons: Vec<WeaponStats>,
}

/// Loader for weapon tables from RON files.
pub struct WeaponLoader;

impl WeaponLoader {
    /// Load and validate a weapon table from a RON file.
    pub fn load(path: &Path) -> LoadResult<WeaponCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid weapon table {}: {}", path.display(), e))
    }

    /// Parse and validate a weapon table from a RON string.
    pub fn parse(content: &str) -> LoadResult<WeaponCatalog> {
        let table: WeaponTable = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse weapon RON: {}", e))?;

        let mut catalog = WeaponCatalog::new();
        for weapon in table.weapons {
            catalog.insert(weapon)?;
        }
        Ok(catalog)
    }
}
