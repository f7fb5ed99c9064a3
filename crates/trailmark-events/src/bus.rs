//! Topic-keyed broadcast bus.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::broadcast;

use crate::event::{EventKind, GameEvent};

/// Default per-topic channel capacity. A subscriber that falls further
/// behind than this loses the oldest events rather than blocking the
/// publisher.
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Topic {
    kind: EventKind,
    slug: String,
}

/// In-process publish/subscribe fan-out keyed by (event kind, game slug).
///
/// Publishing is fire-and-forget: a send never blocks, and a topic with
/// no live subscribers is simply pruned. Receivers deregister themselves
/// by being dropped.
#[derive(Debug)]
pub struct EventBus {
    capacity: usize,
    topics: RwLock<HashMap<Topic, broadcast::Sender<GameEvent>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    /// Creates a bus with the given per-topic capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribes to one (game, kind) topic. Dropping the receiver ends
    /// the subscription.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn subscribe(&self, slug: &str, kind: EventKind) -> broadcast::Receiver<GameEvent> {
        let topic = Topic {
            kind,
            slug: slug.to_owned(),
        };
        let mut topics = self.topics.write().unwrap();
        topics
            .entry(topic)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publishes an event to its kind's topic for one game. Never blocks;
    /// an event with no subscribers is dropped and the dead topic pruned.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn publish(&self, slug: &str, event: GameEvent) {
        let topic = Topic {
            kind: event.kind(),
            slug: slug.to_owned(),
        };
        let delivered = {
            let topics = self.topics.read().unwrap();
            match topics.get(&topic) {
                Some(sender) => sender.send(event).is_ok(),
                None => return,
            }
        };
        if !delivered {
            let mut topics = self.topics.write().unwrap();
            if topics
                .get(&topic)
                .is_some_and(|sender| sender.receiver_count() == 0)
            {
                topics.remove(&topic);
                tracing::debug!(slug = %topic.slug, kind = topic.kind.as_str(), "pruned dead topic");
            }
        }
    }

    /// Live subscriber count for one topic.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn subscriber_count(&self, slug: &str, kind: EventKind) -> usize {
        let topic = Topic {
            kind,
            slug: slug.to_owned(),
        };
        self.topics
            .read()
            .unwrap()
            .get(&topic)
            .map_or(0, broadcast::Sender::receiver_count)
    }
}
