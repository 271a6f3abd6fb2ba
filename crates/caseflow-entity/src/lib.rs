//! # caseflow-entity
//!
//! Domain value objects for Caseflow. Every struct in this crate is an
//! immutable snapshot passed between the presence subsystem and its
//! collaborators. All types derive `Debug`, `Clone`, `Serialize`, and
//! `Deserialize`.

pub mod presence;

pub use presence::{Activity, ActivityKind, ActivityTarget, PresenceStatus, TargetKind};
