//! Event bus and tag-triggered hooks.
//!
//! Two dispatch paths share one mechanism:
//! - [`World::trigger`](crate::World::trigger) fires a tag on a single owner.
//! - [`World::publish`](crate::World::publish) records an envelope on the
//!   [`EventBus`] and fires its tags on every subscriber.
mod bus;
mod envelope;
mod trigger;

pub use bus::EventBus;
pub use envelope::{EventEnvelope, EventId, EventPayload};
pub use trigger::TriggerContext;
