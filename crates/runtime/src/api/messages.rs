//! Message sink that forwards engine notices to async subscribers.

use tokio::sync::broadcast;

use effect_core::{MessageSink, OwnerId, SentMessage};

/// [`MessageSink`] that publishes every notice on a broadcast channel.
///
/// Sending never blocks the world; notices sent while nobody listens are
/// dropped.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: broadcast::Sender<SentMessage>,
}

impl ChannelSink {
    pub fn new(tx: broadcast::Sender<SentMessage>) -> Self {
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SentMessage> {
        self.tx.subscribe()
    }

    fn send(&self, message: SentMessage) {
        if self.tx.send(message).is_err() {
            tracing::trace!("No subscribers for messages");
        }
    }
}

impl MessageSink for ChannelSink {
    fn message(&mut self, owner: OwnerId, text: &str) {
        self.send(SentMessage::Direct {
            to: owner,
            text: text.to_owned(),
        });
    }

    fn broadcast(&mut self, origin: OwnerId, text: &str, exclude: &[OwnerId]) {
        self.send(SentMessage::Broadcast {
            origin,
            text: text.to_owned(),
            exclude: exclude.to_vec(),
        });
    }
}
