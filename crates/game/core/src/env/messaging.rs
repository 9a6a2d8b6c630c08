//! Outbound text notifications.
//!
//! The engine decides *when* an owner should be told something (death,
//! revival); the sink decides how text reaches players.

use std::sync::{Arc, Mutex};

use crate::state::OwnerId;

/// Messaging sink consumed by the engine.
pub trait MessageSink: Send {
    /// Sends text to a single owner.
    fn message(&mut self, owner: OwnerId, text: &str);

    /// Sends text to everyone sharing `origin`'s location, except `exclude`.
    fn broadcast(&mut self, origin: OwnerId, text: &str, exclude: &[OwnerId]);
}

/// Sink that drops every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn message(&mut self, _owner: OwnerId, _text: &str) {}

    fn broadcast(&mut self, _origin: OwnerId, _text: &str, _exclude: &[OwnerId]) {}
}

/// A message captured by [`RecordingSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SentMessage {
    Direct {
        to: OwnerId,
        text: String,
    },
    Broadcast {
        origin: OwnerId,
        text: String,
        exclude: Vec<OwnerId>,
    },
}

/// Sink that records messages into a shared log.
///
/// Clones share the same log, so a caller can keep one handle while the world
/// owns the other.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    log: Arc<Mutex<Vec<SentMessage>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every message recorded so far.
    pub fn messages(&self) -> Vec<SentMessage> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Texts sent directly to `owner`, in order.
    pub fn texts_to(&self, owner: OwnerId) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|message| match message {
                SentMessage::Direct { to, text } if to == owner => Some(text),
                _ => None,
            })
            .collect()
    }

    fn push(&self, message: SentMessage) {
        if let Ok(mut log) = self.log.lock() {
            log.push(message);
        }
    }
}

impl MessageSink for RecordingSink {
    fn message(&mut self, owner: OwnerId, text: &str) {
        self.push(SentMessage::Direct {
            to: owner,
            text: text.to_owned(),
        });
    }

    fn broadcast(&mut self, origin: OwnerId, text: &str, exclude: &[OwnerId]) {
        self.push(SentMessage::Broadcast {
            origin,
            text: text.to_owned(),
            exclude: exclude.to_vec(),
        });
    }
}
