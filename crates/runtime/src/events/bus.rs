//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{CombatEvent, PlayerEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Encounter lifecycle and resolved turns
    Combat,
    /// Persistent player resources
    Player,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Combat(CombatEvent),
    Player(PlayerEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Player(_) => Topic::Player,
        }
    }
}

impl From<CombatEvent> for Event {
    fn from(event: CombatEvent) -> Self {
        Event::Combat(event)
    }
}

impl From<PlayerEvent> for Event {
    fn from(event: PlayerEvent) -> Self {
        Event::Player(event)
    }
}

/// Topic-based event bus
///
/// Publishing never blocks and never fails: a topic with no subscribers
/// simply drops the event. Clones share the same channels.
#[derive(Clone)]
pub struct EventBus {
    combat: broadcast::Sender<Event>,
    player: broadcast::Sender<Event>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a bus holding up to `capacity` unread events per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            combat: broadcast::channel(capacity).0,
            player: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Player => &self.player,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("combat_subscribers", &self.combat.receiver_count())
            .field("player_subscribers", &self.player.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut combat = bus.subscribe(Topic::Combat);
        let mut player = bus.subscribe(Topic::Player);

        bus.publish(PlayerEvent::GoldChanged {
            gold: 65,
            delta: 15,
        });

        assert!(combat.try_recv().is_err());
        match player.try_recv() {
            Ok(Event::Player(PlayerEvent::GoldChanged { gold, delta })) => {
                assert_eq!((gold, delta), (65, 15));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(PlayerEvent::FloorAdvanced { floor: 1, act: 1 });
        let clone = bus.clone();
        let mut rx = clone.subscribe(Topic::Player);
        bus.publish(PlayerEvent::FloorAdvanced { floor: 2, act: 1 });
        assert!(rx.try_recv().is_ok());
    }
}
