//! Outbound delivery seam between the presence tracker and the transport.

use crate::message::PresenceMessage;

/// Shared topic every connected staff client subscribes to for presence
/// deltas.
pub const PRESENCE_TOPIC: &str = "presence:global";

/// Name of the private queue for one user.
pub fn user_queue(username: &str) -> String {
    format!("user:{username}")
}

/// Where the tracker pushes presence messages.
///
/// Delivery is best-effort and fire-and-forget: implementations must not
/// block the caller and must not surface delivery failures. Registry state
/// is always mutated before the corresponding publish, so a lost message
/// is recovered by the next snapshot.
pub trait BroadcastSink: Send + Sync + std::fmt::Debug {
    /// Publish a message to the shared presence topic.
    fn broadcast(&self, message: &PresenceMessage);

    /// Deliver a message point-to-point to one user's private queue.
    fn send_to_user(&self, username: &str, message: &PresenceMessage);
}
