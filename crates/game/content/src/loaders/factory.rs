//! Content factory for loading every content file from a data directory.

use std::path::{Path, PathBuf};

use effect_core::{EffectCatalog, EngineConfig, HookTable};

use crate::WeaponCatalog;
use crate::loaders::{ConfigLoader, EffectLoader, LoadResult, WeaponLoader};

/// Content factory that loads all effect content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── effects.ron
/// └── weapons.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load `config.toml` if present, otherwise the defaults.
    pub fn load_config_or_default(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("config.toml");
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            Ok(EngineConfig::default())
        }
    }

    /// Load `effects.ron` into a catalog whose hook ids resolve against
    /// `hooks`.
    pub fn load_effects(&self, hooks: HookTable) -> LoadResult<EffectCatalog> {
        let mut catalog = EffectCatalog::with_hooks(hooks);
        EffectLoader::load_into(&self.data_dir.join("effects.ron"), &mut catalog)?;
        Ok(catalog)
    }

    /// Load the weapon table from `weapons.ron`.
    pub fn load_weapons(&self) -> LoadResult<WeaponCatalog> {
        WeaponLoader::load(&self.data_dir.join("weapons.ron"))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let factory = ContentFactory::new("/nonexistent/effect-content");
        assert_eq!(factory.load_config_or_default().unwrap(), EngineConfig::default());
        assert!(factory.load_config().is_err());
    }
}
