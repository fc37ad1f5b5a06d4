//! Notification bus with one-shot subscriptions.
//!
//! One-shot subscriptions remove themselves after first delivery, so a
//! teardown observer cannot leak when a scenario exits abnormally.

use serde::{Deserialize, Serialize};

/// Notification topics emitted by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// The overlay has begun initializing
    OverlayInitializing,
    /// The overlay has been fully torn down
    OverlayDestroyed,
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OverlayInitializing => write!(f, "overlay-initializing"),
            Self::OverlayDestroyed => write!(f, "overlay-destroyed"),
        }
    }
}

/// Identifier for a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

/// Handle to a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    /// Observer identifier
    pub id: SubscriptionId,
    /// Topic the observer listens on
    pub topic: Topic,
}

#[derive(Debug)]
struct Observer {
    id: SubscriptionId,
    topic: Topic,
    once: bool,
}

/// Topic-based notification bus
#[derive(Debug, Default)]
pub struct NotificationBus {
    next_id: u64,
    observers: Vec<Observer>,
}

impl NotificationBus {
    /// Create an empty bus
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for a topic
    pub fn subscribe(&mut self, topic: Topic) -> Subscription {
        self.register(topic, false)
    }

    /// Register an observer that auto-unsubscribes after first delivery
    pub fn subscribe_once(&mut self, topic: Topic) -> Subscription {
        self.register(topic, true)
    }

    fn register(&mut self, topic: Topic, once: bool) -> Subscription {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.observers.push(Observer { id, topic, once });
        Subscription { id, topic }
    }

    /// Remove an observer. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != subscription.id);
        self.observers.len() != before
    }

    /// Deliver a notification, returning the observers it reached.
    ///
    /// One-shot observers are removed before this returns.
    pub fn notify(&mut self, topic: Topic) -> Vec<Subscription> {
        let delivered: Vec<Subscription> = self
            .observers
            .iter()
            .filter(|o| o.topic == topic)
            .map(|o| Subscription { id: o.id, topic })
            .collect();
        self.observers.retain(|o| o.topic != topic || !o.once);
        delivered
    }

    /// Number of registered observers
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Whether a subscription is still registered
    #[must_use]
    pub fn is_registered(&self, subscription: Subscription) -> bool {
        self.observers.iter().any(|o| o.id == subscription.id)
    }
}
