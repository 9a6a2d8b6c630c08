//! Engine configuration loader.

use std::path::Path;

use effect_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys take their defaults.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    /// Parse and validate config from a TOML string.
    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(config.expiry_epsilon.is_finite() && config.expiry_epsilon > 0.0) {
            anyhow::bail!("expiry_epsilon must be positive, got {}", config.expiry_epsilon);
        }
        if !(config.revive_delay.is_finite() && config.revive_delay >= 0.0) {
            anyhow::bail!("revive_delay must not be negative, got {}", config.revive_delay);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("revive_delay = 12.5\n").unwrap();
        assert_eq!(config.revive_delay, 12.5);
        assert_eq!(config.expiry_epsilon, EngineConfig::DEFAULT_EXPIRY_EPSILON);
        assert_eq!(config.default_element, EngineConfig::DEFAULT_ELEMENT);
    }

    #[test]
    fn rejects_non_positive_epsilon() {
        let err = ConfigLoader::parse("expiry_epsilon = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("expiry_epsilon"));
    }
}
