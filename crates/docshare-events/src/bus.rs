//! Event bus implementation
//!
//! This module provides the event bus abstraction and an in-memory
//! implementation for publishing and subscribing to lifecycle events.

use crate::types::Event;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};

/// Event bus error types.
#[derive(Debug, Error)]
pub enum EventBusError {
    /// Failed to publish event
    #[error("Failed to publish event: {0}")]
    PublishError(String),

    /// Failed to subscribe
    #[error("Failed to subscribe: {0}")]
    SubscribeError(String),

    /// Channel closed
    #[error("Channel closed")]
    ChannelClosed,
}

/// Result type for event bus operations.
pub type EventBusResult<T> = Result<T, EventBusError>;

/// Subscription handle for receiving events.
pub struct Subscription {
    /// Topic pattern
    pub topic: String,
    /// Event receiver
    pub receiver: broadcast::Receiver<Event>,
}

impl Subscription {
    /// Receive the next event.
    pub async fn recv(&mut self) -> EventBusResult<Event> {
        self.receiver
            .recv()
            .await
            .map_err(|_| EventBusError::ChannelClosed)
    }

    /// Receive an already-published event without waiting.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }

    /// Drain every event published so far.
    pub fn drain(&mut self) -> Vec<Event> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Event bus trait for publish/subscribe operations.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event.
    async fn publish(&self, event: Event) -> EventBusResult<()>;

    /// Subscribe to a topic pattern.
    ///
    /// Topic patterns support wildcards:
    /// - `*` matches any single segment
    /// - `#` matches zero or more segments
    ///
    /// Examples:
    /// - `invite.*` matches `invite.generated`, `invite.revoked`
    /// - `#` matches every event
    async fn subscribe(&self, topic: &str) -> EventBusResult<Subscription>;
}

/// Check if a topic matches a pattern.
pub fn topic_matches(pattern: &str, topic: &str) -> bool {
    let pattern_parts: Vec<&str> = pattern.split('.').collect();
    let topic_parts: Vec<&str> = topic.split('.').collect();
    parts_match(&pattern_parts, &topic_parts)
}

fn parts_match(pattern: &[&str], topic: &[&str]) -> bool {
    match (pattern.first(), topic.first()) {
        (None, None) => true,
        (Some(&"#"), _) => {
            // Zero segments, or consume one and stay on `#`
            parts_match(&pattern[1..], topic) || (!topic.is_empty() && parts_match(pattern, &topic[1..]))
        }
        (Some(&"*"), Some(_)) => parts_match(&pattern[1..], &topic[1..]),
        (Some(segment), Some(part)) => segment == part && parts_match(&pattern[1..], &topic[1..]),
        _ => false,
    }
}

/// In-memory event bus implementation.
///
/// Suitable for a single process and for tests. One broadcast channel per
/// distinct topic pattern; dropping every receiver of a pattern just makes
/// later sends to it no-ops.
pub struct MemoryEventBus {
    /// Topic pattern to channel
    subscribers: Arc<RwLock<HashMap<String, broadcast::Sender<Event>>>>,
    /// Default channel capacity
    channel_capacity: usize,
}

impl std::fmt::Debug for MemoryEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEventBus")
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}

impl MemoryEventBus {
    /// Create a new in-memory event bus.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create with custom channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            channel_capacity: capacity,
        }
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: Event) -> EventBusResult<()> {
        let topic = event.topic().to_string();
        let mut delivered = 0usize;

        {
            let subscribers = self.subscribers.read().await;
            for (pattern, sender) in subscribers.iter() {
                if topic_matches(pattern, &topic) {
                    if let Ok(receivers) = sender.send(event.clone()) {
                        delivered += receivers;
                    }
                }
            }
        }

        tracing::debug!(topic = %topic, event_id = %event.id, delivered, "Event published");

        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> EventBusResult<Subscription> {
        if topic.is_empty() {
            return Err(EventBusError::SubscribeError("empty topic pattern".to_string()));
        }

        let receiver = {
            let mut subscribers = self.subscribers.write().await;

            if let Some(sender) = subscribers.get(topic) {
                sender.subscribe()
            } else {
                let (sender, receiver) = broadcast::channel(self.channel_capacity);
                subscribers.insert(topic.to_string(), sender);
                receiver
            }
        };

        Ok(Subscription {
            topic: topic.to_string(),
            receiver,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_event_bus_publish_subscribe() {
        let bus = MemoryEventBus::new();

        let mut sub = bus.subscribe("invite.*").await.unwrap();

        let event = Event::new("invite.revoked", serde_json::json!({}));
        bus.publish(event.clone()).await.unwrap();

        let received = tokio::time::timeout(std::time::Duration::from_millis(100), sub.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(received.id, event.id);
    }

    #[tokio::test]
    async fn test_non_matching_subscription_receives_nothing() {
        let bus = MemoryEventBus::new();
        let mut sub = bus.subscribe("member.*").await.unwrap();

        bus.publish(Event::new("invite.generated", serde_json::json!({})))
            .await
            .unwrap();

        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_topic_matching() {
        // Exact match
        assert!(topic_matches("invite.consumed", "invite.consumed"));

        // Single wildcard
        assert!(topic_matches("invite.*", "invite.consumed"));
        assert!(topic_matches("*.consumed", "invite.consumed"));

        // Multi-segment wildcard
        assert!(topic_matches("#", "invite.consumed"));
        assert!(topic_matches("invite.#", "invite.consumed"));
        assert!(topic_matches("invite.#", "invite"));
        assert!(topic_matches("#.consumed", "invite.consumed"));

        // Non-matches
        assert!(!topic_matches("invite.revoked", "invite.consumed"));
        assert!(!topic_matches("member.*", "invite.consumed"));
        assert!(!topic_matches("invite.*", "invite"));
        assert!(!topic_matches("*", "invite.consumed"));
    }

    #[tokio::test]
    async fn test_overlapping_patterns_each_receive() {
        let bus = MemoryEventBus::new();
        let mut exact = bus.subscribe("member.joined").await.unwrap();
        let mut wildcard = bus.subscribe("member.*").await.unwrap();
        let mut everything = bus.subscribe("#").await.unwrap();
        let mut same_pattern = bus.subscribe("member.*").await.unwrap();

        bus.publish(Event::new("member.joined", serde_json::json!({})))
            .await
            .unwrap();
        bus.publish(Event::new("invite.generated", serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(exact.drain().len(), 1);
        assert_eq!(wildcard.drain().len(), 1);
        assert_eq!(same_pattern.drain().len(), 1);
        assert_eq!(everything.drain().len(), 2);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = MemoryEventBus::new();
        let sub = bus.subscribe("invite.*").await.unwrap();
        drop(sub);

        bus.publish(Event::new("invite.revoked", serde_json::json!({})))
            .await
            .unwrap();
        assert!(matches!(
            bus.subscribe("").await,
            Err(EventBusError::SubscribeError(_))
        ));
    }
}
