//! Per-connection and per-user presence state.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use caseflow_core::types::{SessionId, UserId};
use caseflow_entity::presence::Activity;

/// State of one live client connection.
///
/// Owned exclusively by the [`UserPresence`] that contains it; never
/// shared across users.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Connection id assigned by the transport layer.
    pub session_id: SessionId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub username: String,
    /// What this session is doing right now.
    pub current_activity: Activity,
    /// Last proof of liveness from the client.
    pub last_heartbeat: DateTime<Utc>,
    /// Whether the connection is live. Flipped off when the session is
    /// removed, so a state extracted on the removal path reads as dead.
    pub connected: bool,
}

impl SessionState {
    /// Create a fresh idle session.
    pub fn new(session_id: SessionId, user_id: UserId, username: String) -> Self {
        Self {
            session_id,
            user_id,
            username,
            current_activity: Activity::idle(),
            last_heartbeat: Utc::now(),
            connected: true,
        }
    }

    /// Record proof of liveness.
    ///
    /// The wall clock may step backwards; the heartbeat never does.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_heartbeat {
            self.last_heartbeat = now;
        }
    }

    /// Replace the current activity. Any client-originated message proves
    /// liveness, so this also counts as a heartbeat.
    pub fn set_activity(&mut self, activity: Activity, now: DateTime<Utc>) {
        self.current_activity = activity;
        self.touch(now);
    }

    /// Whether this session's heartbeat is older than the timeout.
    pub fn is_stale(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.last_heartbeat > timeout
    }
}

/// All live sessions for one logical user.
///
/// Created lazily on first session registration; removed from the
/// registry as soon as the last session goes — an empty session map never
/// survives an operation.
#[derive(Debug, Clone)]
pub struct UserPresence {
    /// User id.
    pub user_id: UserId,
    /// Display name, captured when the first session registered.
    pub username: String,
    /// Session id → session state.
    pub sessions: HashMap<SessionId, SessionState>,
}

impl UserPresence {
    /// Create an empty presence record for a user.
    pub fn new(user_id: UserId, username: String) -> Self {
        Self {
            user_id,
            username,
            sessions: HashMap::new(),
        }
    }

    /// A user is online iff at least one session exists.
    pub fn is_online(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
