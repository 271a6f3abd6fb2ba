//! Inbound session events and outbound presence messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use caseflow_core::types::{SessionId, UserId};
use caseflow_entity::presence::{Activity, PresenceStatus};

/// Lifecycle and client events delivered by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// An authenticated client connection was established.
    Connected {
        /// Connection id assigned by the transport.
        session_id: SessionId,
        /// Authenticated user.
        user_id: UserId,
        /// Display name.
        username: String,
    },
    /// A client connection closed.
    Disconnected {
        /// Connection id.
        session_id: SessionId,
    },
    /// A client subscribed to a destination.
    Subscribed {
        /// Connection id.
        session_id: SessionId,
        /// Subscribing user's display name (addresses the private queue).
        username: String,
        /// Destination name the client subscribed to.
        destination: String,
    },
    /// A client reported what it is working on.
    Activity {
        /// Connection id.
        session_id: SessionId,
        /// The new activity snapshot.
        activity: Activity,
    },
    /// A client liveness signal.
    Heartbeat {
        /// Connection id.
        session_id: SessionId,
    },
}

/// Status carried by a presence update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    /// A new session came online.
    Connected,
    /// The user's last session went away.
    Offline,
    /// A session changed what it is doing.
    Activity,
}

/// One session's activity within a snapshot entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionActivity {
    /// Connection id.
    pub session_id: SessionId,
    /// What that session is doing.
    pub activity: Activity,
}

/// One online user within a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    /// User id.
    pub user_id: UserId,
    /// Display name.
    pub username: String,
    /// Always online — the registry holds no record of offline users.
    pub status: PresenceStatus,
    /// Per-session activities, ordered by session id.
    pub activities: Vec<SessionActivity>,
}

/// Messages published to the staff presence topic and private user queues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresenceMessage {
    /// A delta: one user's presence changed.
    Update {
        /// Affected user.
        user_id: UserId,
        /// Session that triggered the change.
        session_id: SessionId,
        /// What happened.
        status: UpdateStatus,
        /// The new activity, present iff status is activity.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        activity: Option<Activity>,
        /// When the change was observed.
        timestamp: DateTime<Utc>,
    },
    /// A full point-in-time description of all online users.
    Snapshot {
        /// Currently online users, ordered by user id.
        users: Vec<UserSnapshot>,
    },
}
