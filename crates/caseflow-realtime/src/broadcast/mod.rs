//! Broadcast fan-out: the sink trait and the in-memory pub/sub.

pub mod memory;
pub mod sink;

pub use memory::MemoryPubSub;
pub use sink::{BroadcastSink, PRESENCE_TOPIC, user_queue};
