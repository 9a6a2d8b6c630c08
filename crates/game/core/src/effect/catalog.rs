//! Registry of validated effect definitions and their bound hooks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{DefinitionError, EffectDefinition, EffectHooks, HookTable, NoHooks};

/// A definition together with the hooks resolved for it.
#[derive(Clone)]
pub struct CatalogEntry {
    pub definition: Arc<EffectDefinition>,
    pub hooks: Arc<dyn EffectHooks>,
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("definition", &self.definition.key)
            .field("hooks", &self.definition.hooks)
            .finish()
    }
}

/// All definitions known to a world, keyed by definition key.
///
/// Registration validates every definition, so anything reachable through the
/// catalog is well-formed.
#[derive(Clone, Default, Debug)]
pub struct EffectCatalog {
    entries: HashMap<String, CatalogEntry>,
    hook_table: HookTable,
}

impl EffectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog that resolves hook ids against `hook_table`.
    pub fn with_hooks(hook_table: HookTable) -> Self {
        Self {
            entries: HashMap::new(),
            hook_table,
        }
    }

    /// Hook implementations available to definitions registered later.
    pub fn hook_table_mut(&mut self) -> &mut HookTable {
        &mut self.hook_table
    }

    /// Validates and registers a definition, resolving its hook id.
    ///
    /// Definitions without a hook id get [`NoHooks`].
    pub fn register(&mut self, definition: EffectDefinition) -> Result<(), DefinitionError> {
        let hooks = match &definition.hooks {
            Some(id) => {
                self.hook_table
                    .get(id)
                    .ok_or_else(|| DefinitionError::UnknownHooks {
                        key: definition.key.clone(),
                        hooks: id.clone(),
                    })?
            }
            None => Arc::new(NoHooks),
        };
        self.insert(definition, hooks)
    }

    /// Validates and registers a definition with an explicit implementation.
    pub fn register_with(
        &mut self,
        definition: EffectDefinition,
        hooks: impl EffectHooks + 'static,
    ) -> Result<(), DefinitionError> {
        self.insert(definition, Arc::new(hooks))
    }

    /// Registers many definitions, stopping at the first invalid one.
    pub fn register_all(
        &mut self,
        definitions: impl IntoIterator<Item = EffectDefinition>,
    ) -> Result<usize, DefinitionError> {
        let mut count = 0;
        for definition in definitions {
            self.register(definition)?;
            count += 1;
        }
        Ok(count)
    }

    fn insert(
        &mut self,
        definition: EffectDefinition,
        hooks: Arc<dyn EffectHooks>,
    ) -> Result<(), DefinitionError> {
        definition.validate()?;
        if self.entries.contains_key(&definition.key) {
            return Err(DefinitionError::DuplicateKey {
                key: definition.key,
            });
        }
        tracing::debug!(key = %definition.key, "registered effect definition");
        self.entries.insert(
            definition.key.clone(),
            CatalogEntry {
                definition: Arc::new(definition),
                hooks,
            },
        );
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    pub fn definition(&self, key: &str) -> Option<&Arc<EffectDefinition>> {
        self.entries.get(key).map(|entry| &entry.definition)
    }

    pub fn hooks(&self, key: &str) -> Option<Arc<dyn EffectHooks>> {
        self.entries.get(key).map(|entry| Arc::clone(&entry.hooks))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered definition keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
