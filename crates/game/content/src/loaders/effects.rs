//! Effect definition loader.

use std::path::Path;

use effect_core::{EffectCatalog, EffectDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Effect file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectFile {
    pub effects: Vec<EffectDefinition>,
}

/// Loader for effect definitions from RON files.
pub struct EffectLoader;

impl EffectLoader {
    /// Load and validate effect definitions from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<EffectDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid effect file {}: {}", path.display(), e))
    }

    /// Parse and validate effect definitions from a RON string.
    pub fn parse(content: &str) -> LoadResult<Vec<EffectDefinition>> {
        let file: EffectFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect RON: {}", e))?;

        for definition in &file.effects {
            definition
                .validate()
                .map_err(|e| anyhow::anyhow!("Effect '{}': {}", definition.key, e))?;
        }
        Ok(file.effects)
    }

    /// Load a RON file and register every definition into `catalog`.
    ///
    /// Hook ids are resolved against the catalog's hook table. Returns the
    /// number of definitions registered.
    pub fn load_into(path: &Path, catalog: &mut EffectCatalog) -> LoadResult<usize> {
        let definitions = Self::load(path)?;
        catalog
            .register_all(definitions)
            .map_err(|e| anyhow::anyhow!("Failed to register effects from {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use effect_core::{EffectFlags, ModifierOp};

    use super::*;

    const EFFECTS: &str = r#"(
        effects: [
            (
                key: "haste",
                name: "Haste",
                duration: 10.0,
                max_stacks: Some(3),
                flags: "STACKING | REFRESH",
                modifiers: [
                    (stat: "accuracy", op: Add, base: 5.0, per_stack: 2.5),
                ],
                trigger_tags: ["hit"],
            ),
            (
                key: "aura",
                name: "Aura",
                flavor: "A faint glow.",
                duration: -1.0,
            ),
        ],
    )"#;

    #[test]
    fn parses_definitions_with_defaults() {
        let definitions = EffectLoader::parse(EFFECTS).unwrap();
        assert_eq!(definitions.len(), 2);

        let haste = &definitions[0];
        assert_eq!(haste.flags, EffectFlags::STACKING | EffectFlags::REFRESH);
        assert_eq!(haste.stack_cap(), 3);
        assert_eq!(haste.modifiers[0].op, ModifierOp::Add);
        assert!(haste.trigger_tags.contains("hit"));

        let aura = &definitions[1];
        assert!(aura.is_infinite());
        assert_eq!(aura.flavor, "A faint glow.");
        assert!(aura.modifiers.is_empty());
    }

    #[test]
    fn rejects_stacking_without_cap() {
        let err = EffectLoader::parse(
            r#"(effects: [(key: "bad", name: "Bad", duration: 1.0, flags: "STACKING")])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bad"));
    }
}
