//! Tag-based trigger dispatch.
//!
//! ```text
//! trigger(owner, tag)            publish(name, tags)
//!      │                               │ record envelope
//!      │                               ▼
//!      │                        each subscriber, in order
//!      ▼                               │
//!  cleanup(owner) ◄────────────────────┘
//!      │
//!      ▼
//!  snapshot instances listening to the tag(s)
//!      │ skip removed / paused at dispatch time
//!      ▼
//!  EffectHooks::on_trigger(world, ctx)
//! ```

use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::{EventEnvelope, EventId, EventPayload};
use crate::effect::{EffectDefinition, EffectInstance};
use crate::state::OwnerId;
use crate::world::World;

/// Context handed to `on_trigger`.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerContext {
    /// Tag passed to `trigger`, or the event name for published events.
    pub tag: String,
    pub origin: Option<OwnerId>,
    pub target: Option<OwnerId>,
    /// Live snapshot of the instance being triggered.
    pub effect: EffectInstance,
    /// Envelope id when dispatched through the bus.
    pub event: Option<EventId>,
    pub payload: EventPayload,
}

impl World {
    /// Fires every instance on `owner` that listens to `tag`.
    ///
    /// Expired instances are swept first. Returns the number of hooks called.
    pub fn trigger(
        &mut self,
        owner: OwnerId,
        tag: &str,
        origin: Option<OwnerId>,
        target: Option<OwnerId>,
        payload: EventPayload,
    ) -> usize {
        self.cleanup(owner);
        let listeners = self.listeners(owner, |definition| {
            definition.listens_to(std::iter::once(tag))
        });
        trace!(%owner, tag, listeners = listeners.len(), "trigger");

        let mut fired = 0;
        for key in listeners {
            let ctx = |effect| TriggerContext {
                tag: tag.to_owned(),
                origin,
                target,
                effect,
                event: None,
                payload: payload.clone(),
            };
            if self.dispatch_trigger(owner, &key, ctx) {
                fired += 1;
            }
        }
        fired
    }

    /// Records an event and dispatches it to every subscriber whose instances
    /// listen to any of `tags`.
    pub fn publish<I, S>(
        &mut self,
        name: &str,
        source: Option<OwnerId>,
        payload: EventPayload,
        tags: I,
    ) -> EventEnvelope
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let envelope = EventEnvelope {
            id: self.bus.next_id(),
            name: name.to_owned(),
            source,
            timestamp: self.now(),
            payload,
            tags: tags.into_iter().map(Into::into).collect::<BTreeSet<_>>(),
        };
        self.bus.record(envelope.clone());
        debug!(id = %envelope.id, name, tags = ?envelope.tags, "published event");

        for subscriber in self.bus.subscribers().to_vec() {
            if !self.owners.contains_key(&subscriber) {
                continue;
            }
            self.cleanup(subscriber);
            let listeners = self.listeners(subscriber, |definition| {
                definition.listens_to(envelope.tags.iter().map(String::as_str))
            });
            for key in listeners {
                let ctx = |effect| TriggerContext {
                    tag: envelope.name.clone(),
                    origin: envelope.source,
                    target: envelope.payload.target(),
                    effect,
                    event: Some(envelope.id),
                    payload: envelope.payload.clone(),
                };
                self.dispatch_trigger(subscriber, &key, ctx);
            }
        }
        envelope
    }

    /// Adds `owner` to the bus. Owners are subscribed when spawned.
    pub fn subscribe(&mut self, owner: OwnerId) -> bool {
        self.bus.subscribe(owner)
    }

    pub fn unsubscribe(&mut self, owner: OwnerId) -> bool {
        self.bus.unsubscribe(owner)
    }

    /// Keys of unpaused instances on `owner` whose definition matches.
    fn listeners(
        &self,
        owner: OwnerId,
        mut matches: impl FnMut(&EffectDefinition) -> bool,
    ) -> Vec<String> {
        let Some(entry) = self.owners.get(&owner) else {
            return Vec::new();
        };
        entry
            .effects
            .keys_where(|instance| {
                !instance.paused
                    && self
                        .catalog
                        .definition(&instance.definition)
                        .is_some_and(|definition| matches(definition.as_ref()))
            })
    }

    /// Calls `on_trigger` for the instance under `key` if it is still live.
    fn dispatch_trigger(
        &mut self,
        owner: OwnerId,
        key: &str,
        context: impl FnOnce(EffectInstance) -> TriggerContext,
    ) -> bool {
        let Some(effect) = self
            .owners
            .get(&owner)
            .and_then(|entry| entry.effects.get(key))
            .filter(|instance| !instance.paused)
            .cloned()
        else {
            trace!(%owner, key, "skipped trigger for removed instance");
            return false;
        };
        let Some(hooks) = self.catalog.hooks(&effect.definition) else {
            return false;
        };
        hooks.on_trigger(self, &context(effect));
        true
    }
}
