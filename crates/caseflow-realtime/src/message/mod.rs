//! Wire message type definitions for the presence subsystem.

pub mod types;

pub use types::{PresenceMessage, SessionActivity, SessionEvent, UpdateStatus, UserSnapshot};
