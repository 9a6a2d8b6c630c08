//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the world and repositories so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use effect_core::{AttributeError, WorldError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("world worker command channel closed")]
    CommandChannelClosed,

    #[error("world worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("world worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Attribute(#[from] AttributeError),

    #[error("runtime requires an effect catalog or a prebuilt world")]
    MissingWorld,

    #[error("no repository configured for save/load")]
    MissingRepository,
}
