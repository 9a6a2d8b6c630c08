//! Subscriber registry and bounded event history.

use std::collections::VecDeque;

use super::{EventEnvelope, EventId};
use crate::state::OwnerId;

/// Global event bus.
///
/// Holds the ordered set of subscribed owners and the most recent envelopes.
/// Dispatch itself lives on [`World::publish`](crate::World::publish) because
/// it needs the owners' stores.
#[derive(Clone, Debug)]
pub struct EventBus {
    subscribers: Vec<OwnerId>,
    history: VecDeque<EventEnvelope>,
    capacity: usize,
    next_id: u64,
}

impl EventBus {
    /// Creates a bus that keeps the last `capacity` envelopes.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Vec::new(),
            history: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_id: 0,
        }
    }

    /// Adds `owner` to the subscriber set. Returns false if already present.
    pub fn subscribe(&mut self, owner: OwnerId) -> bool {
        if self.subscribers.contains(&owner) {
            return false;
        }
        self.subscribers.push(owner);
        true
    }

    /// Removes `owner` from the subscriber set. Returns false if absent.
    pub fn unsubscribe(&mut self, owner: OwnerId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|id| *id != owner);
        before != self.subscribers.len()
    }

    pub fn is_subscribed(&self, owner: OwnerId) -> bool {
        self.subscribers.contains(&owner)
    }

    /// Subscribers in subscription order.
    pub fn subscribers(&self) -> &[OwnerId] {
        &self.subscribers
    }

    /// Reserves the next envelope id.
    pub fn next_id(&mut self) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Appends an envelope, evicting the oldest once full.
    pub fn record(&mut self, envelope: EventEnvelope) {
        if self.capacity == 0 {
            return;
        }
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(envelope);
    }

    /// Retained envelopes, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &EventEnvelope> {
        self.history.iter()
    }

    /// Retained envelopes with the given name, oldest first.
    pub fn events_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a EventEnvelope> {
        self.history.iter().filter(move |e| e.name == name)
    }

    /// Drains the retained history.
    pub fn take_history(&mut self) -> Vec<EventEnvelope> {
        self.history.drain(..).collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::EngineConfig::DEFAULT_EVENT_HISTORY)
    }
}
