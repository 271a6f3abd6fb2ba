//! # caseflow-realtime
//!
//! Real-time presence engine for Caseflow. Provides:
//!
//! - Session registry mapping staff users to their live connections
//! - Presence tracking with online/offline transitions and activity updates
//! - Stale-session sweeping on a fixed period
//! - Best-effort pub/sub fan-out to connected staff clients
//!
//! The transport layer (WebSocket/STOMP endpoint, authentication) is an
//! external collaborator: it feeds [`message::SessionEvent`]s into the
//! [`PresenceEngine`] and subscribes clients to the topics the engine
//! publishes into.

pub mod broadcast;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod server;

pub use broadcast::memory::MemoryPubSub;
pub use broadcast::sink::{BroadcastSink, PRESENCE_TOPIC};
pub use message::{PresenceMessage, SessionEvent};
pub use metrics::PresenceMetrics;
pub use presence::registry::SessionRegistry;
pub use presence::tracker::PresenceTracker;
pub use server::PresenceEngine;
