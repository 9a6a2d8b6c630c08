//! Public runtime API surface.
//!
//! Re-exports the handle, message sink and error types so downstream crates
//! can depend on a single module.
mod errors;
mod handle;
mod messages;

pub use errors::{Result, RuntimeError};
pub use handle::RuntimeHandle;
pub use messages::ChannelSink;
