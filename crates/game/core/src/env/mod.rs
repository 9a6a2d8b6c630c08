//! Collaborators injected into the world.
//!
//! The engine consumes three external services: a source of randomness for
//! combat rolls, a messaging sink for player-facing notices, and a persistent
//! attribute store. Each is a trait so the runtime and tests can plug in their
//! own implementations.
mod attributes;
mod messaging;
mod rng;

pub use attributes::{AttributeError, AttributeStore, MemoryAttributes};
pub use messaging::{MessageSink, NullSink, RecordingSink, SentMessage};
pub use rng::{PcgRng, RollSource, SequenceRng};
