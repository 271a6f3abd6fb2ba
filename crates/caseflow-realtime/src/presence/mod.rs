//! Staff presence tracking.

pub mod registry;
pub mod session;
pub mod sweeper;
pub mod tracker;

pub use registry::SessionRegistry;
pub use session::{SessionState, UserPresence};
pub use tracker::PresenceTracker;
