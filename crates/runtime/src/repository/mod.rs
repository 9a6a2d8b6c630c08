//! Durable storage for owners and the timer table.
//!
//! The world encodes owners into the [`AttributeStore`](effect_core::AttributeStore)
//! contract; this module supplies the file-backed store used between
//! sessions. World-wide entries (the owner index and timers) live under
//! [`OwnerId::WORLD`](effect_core::OwnerId::WORLD).
mod error;
mod file;

pub use error::RepositoryError;
pub use file::FileAttributeStore;

/// World attribute listing every persisted owner id.
pub const OWNERS_ATTRIBUTE: &str = "owners";

/// World attribute holding the encoded timer table.
pub const TIMERS_ATTRIBUTE: &str = "timers";
