//! In-memory pub/sub for single-node deployments.

use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::message::PresenceMessage;

use super::sink::{BroadcastSink, PRESENCE_TOPIC, user_queue};

/// In-memory pub/sub implementation.
///
/// Topics are created lazily on first subscription; publishing to a topic
/// nobody listens on is a silent no-op.
#[derive(Debug)]
pub struct MemoryPubSub {
    /// Topic name → broadcast sender
    topics: DashMap<String, broadcast::Sender<PresenceMessage>>,
    /// Buffer size for topic channels
    buffer_size: usize,
}

impl MemoryPubSub {
    /// Create a new in-memory pub/sub
    pub fn new(buffer_size: usize) -> Self {
        Self {
            topics: DashMap::new(),
            buffer_size,
        }
    }

    /// Publish a message to a topic
    pub fn publish(&self, topic: &str, message: &PresenceMessage) {
        if let Some(tx) = self.topics.get(topic) {
            // receivers may have lagged or dropped; best-effort only
            let _ = tx.send(message.clone());
        }
    }

    /// Subscribe to a topic, returns a receiver
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<PresenceMessage> {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .subscribe()
    }

    /// Number of topics with at least one past subscription
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

impl BroadcastSink for MemoryPubSub {
    fn broadcast(&self, message: &PresenceMessage) {
        self.publish(PRESENCE_TOPIC, message);
    }

    fn send_to_user(&self, username: &str, message: &PresenceMessage) {
        self.publish(&user_queue(username), message);
    }
}
