use crate::env::AttributeError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::OwnerId;

/// Errors returned by [`World`](super::World) operations.
///
/// Lookup misses on read paths (removing an absent key, checking an unknown
/// owner) are not errors; they return `None` or the base value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WorldError {
    #[error("unknown owner {0}")]
    UnknownOwner(OwnerId),

    #[error("owner {0} already exists")]
    OwnerExists(OwnerId),

    #[error("unknown effect definition '{0}'")]
    UnknownDefinition(String),

    #[error(transparent)]
    Attribute(#[from] AttributeError),

    #[error("failed to encode {what}: {reason}")]
    Encode { what: &'static str, reason: String },

    #[error("failed to decode {what} for {owner}: {reason}")]
    Decode {
        what: &'static str,
        owner: OwnerId,
        reason: String,
    },
}

impl GameError for WorldError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownOwner(_) | Self::OwnerExists(_) | Self::UnknownDefinition(_) => {
                ErrorSeverity::Validation
            }
            Self::Attribute(_) => ErrorSeverity::Recoverable,
            Self::Encode { .. } | Self::Decode { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownOwner(_) => "WORLD_UNKNOWN_OWNER",
            Self::OwnerExists(_) => "WORLD_OWNER_EXISTS",
            Self::UnknownDefinition(_) => "WORLD_UNKNOWN_DEFINITION",
            Self::Attribute(_) => "WORLD_ATTRIBUTE",
            Self::Encode { .. } => "WORLD_ENCODE",
            Self::Decode { .. } => "WORLD_DECODE",
        }
    }
}
