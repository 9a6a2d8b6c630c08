//! File-based attribute store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use effect_core::{AttributeError, AttributeStore, OwnerId};

use super::RepositoryError;

/// On-disk layout: owner id -> attribute key -> bytes.
#[derive(Debug, Default, Serialize, Deserialize)]
struct AttributeDocument {
    owners: BTreeMap<u32, BTreeMap<String, Vec<u8>>>,
}

/// File-backed implementation of [`AttributeStore`].
///
/// All attributes live in a single JSON document that is read on open and
/// rewritten on [`flush`](AttributeStore::flush). Writes before a flush are
/// only held in memory.
///
/// # File Format
///
/// ```json
/// { "owners": { "7": { "combatant": [..bytes..], "effects": [..bytes..] } } }
/// ```
#[derive(Debug)]
pub struct FileAttributeStore {
    path: PathBuf,
    document: AttributeDocument,
    dirty: bool,
}

impl FileAttributeStore {
    /// File name used inside a data directory.
    pub const FILE_NAME: &'static str = "attributes.json";

    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let document = if path.exists() {
            let bytes = fs::read(&path)?;
            serde_json::from_slice(&bytes)?
        } else {
            AttributeDocument::default()
        };

        tracing::debug!("Opened attribute store at {}", path.display());
        Ok(Self {
            path,
            document,
            dirty: false,
        })
    }

    /// Opens `attributes.json` inside `dir`, creating the directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Self::open(dir.join(Self::FILE_NAME))
    }

    /// Opens the store in the platform data directory.
    pub fn open_default() -> Result<Self, RepositoryError> {
        Self::in_dir(crate::dirs::data_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if writes are waiting for a flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn write(&mut self) -> Result<(), RepositoryError> {
        let temp_path = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(&self.document)?;

        // Write to temp file
        fs::write(&temp_path, bytes)?;

        // Atomic rename
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!("Flushed attribute store to {}", self.path.display());
        self.dirty = false;
        Ok(())
    }
}

impl AttributeStore for FileAttributeStore {
    fn get(&self, owner: OwnerId, key: &str) -> Result<Option<Vec<u8>>, AttributeError> {
        Ok(self
            .document
            .owners
            .get(&owner.0)
            .and_then(|attributes| attributes.get(key))
            .cloned())
    }

    fn set(&mut self, owner: OwnerId, key: &str, value: Vec<u8>) -> Result<(), AttributeError> {
        self.document
            .owners
            .entry(owner.0)
            .or_default()
            .insert(key.to_owned(), value);
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), AttributeError> {
        if !self.dirty {
            return Ok(());
        }
        self.write().map_err(AttributeError::from)
    }
}
