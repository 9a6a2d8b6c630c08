//! Content loaders for reading effect data from files.
//!
//! Loaders convert RON/TOML files into effect-core types and validate them on
//! the way in.

pub mod config;
pub mod effects;
pub mod factory;
pub mod weapons;

pub use config::ConfigLoader;
pub use effects::EffectLoader;
pub use factory::ContentFactory;
pub use weapons::WeaponLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
