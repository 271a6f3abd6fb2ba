//! Presence tracker — translates session events into registry mutations
//! plus outbound broadcasts.
//!
//! Presence is best-effort telemetry: every operation tolerates unknown
//! or stale identifiers as a silent no-op, and registry state is mutated
//! before the corresponding broadcast so delivery failures never roll
//! back or block a mutation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use caseflow_core::config::realtime::RealtimeConfig;
use caseflow_core::types::{SessionId, UserId};
use caseflow_entity::presence::{Activity, PresenceStatus};

use crate::broadcast::sink::BroadcastSink;
use crate::message::types::{PresenceMessage, SessionActivity, UpdateStatus, UserSnapshot};
use crate::metrics::PresenceMetrics;

use super::registry::SessionRegistry;

/// Tracks which staff users are connected, via which sessions, doing what.
#[derive(Debug)]
pub struct PresenceTracker {
    /// Session registry.
    registry: SessionRegistry,
    /// Outbound fan-out.
    sink: Arc<dyn BroadcastSink>,
    /// Telemetry counters.
    metrics: Arc<PresenceMetrics>,
    /// Heartbeat staleness threshold.
    heartbeat_timeout: Duration,
}

impl PresenceTracker {
    /// Creates a new tracker publishing into the given sink.
    pub fn new(
        config: &RealtimeConfig,
        sink: Arc<dyn BroadcastSink>,
        metrics: Arc<PresenceMetrics>,
    ) -> Self {
        Self {
            registry: SessionRegistry::new(),
            sink,
            metrics,
            heartbeat_timeout: config.heartbeat_timeout(),
        }
    }

    /// Registers a new authenticated session and announces it on the
    /// presence topic.
    pub fn register_session(&self, session_id: SessionId, user_id: UserId, username: &str) {
        self.registry
            .insert(session_id.clone(), user_id.clone(), username);
        self.metrics.record_session_opened();

        info!(
            session_id = %session_id,
            user_id = %user_id,
            "Presence session registered"
        );

        self.sink.broadcast(&PresenceMessage::Update {
            user_id,
            session_id,
            status: UpdateStatus::Connected,
            activity: None,
            timestamp: Utc::now(),
        });
    }

    /// Removes a session. Announces the user offline only when their last
    /// session goes; unknown session ids are a silent no-op.
    pub fn remove_session(&self, session_id: &SessionId) {
        let Some(removed) = self.registry.remove(session_id) else {
            debug!(session_id = %session_id, "Disconnect for unknown session");
            return;
        };

        self.metrics.record_session_closed();

        debug!(
            session_id = %session_id,
            user_id = %removed.session.user_id,
            went_offline = removed.went_offline,
            "Presence session removed"
        );

        if removed.went_offline {
            self.sink.broadcast(&PresenceMessage::Update {
                user_id: removed.session.user_id,
                session_id: session_id.clone(),
                status: UpdateStatus::Offline,
                activity: None,
                timestamp: Utc::now(),
            });
        }
    }

    /// Replaces a session's activity and announces it. Any
    /// client-originated message proves liveness, so the heartbeat is
    /// bumped too. Unknown session ids are a silent no-op.
    pub fn update_activity(&self, session_id: &SessionId, activity: Activity) {
        let now = Utc::now();
        let Some(user_id) = self
            .registry
            .set_activity(session_id, activity.clone(), now)
        else {
            debug!(session_id = %session_id, "Activity for unknown session");
            return;
        };

        self.metrics.record_activity_update();

        self.sink.broadcast(&PresenceMessage::Update {
            user_id,
            session_id: session_id.clone(),
            status: UpdateStatus::Activity,
            activity: Some(activity),
            timestamp: now,
        });
    }

    /// Records a heartbeat. Not broadcast — heartbeats are not interesting
    /// to other observers. Unknown session ids are a silent no-op.
    pub fn handle_heartbeat(&self, session_id: &SessionId) {
        if self.registry.touch(session_id, Utc::now()) {
            self.metrics.record_heartbeat();
        }
    }

    /// Builds a full snapshot of all currently online users.
    ///
    /// Pure read, deterministic given the registry state: users and their
    /// session activities are ordered by id.
    pub fn snapshot(&self) -> PresenceMessage {
        let mut users: Vec<UserSnapshot> = self
            .registry
            .snapshot_users()
            .into_iter()
            .map(|presence| {
                let mut activities: Vec<SessionActivity> = presence
                    .sessions
                    .values()
                    .map(|s| SessionActivity {
                        session_id: s.session_id.clone(),
                        activity: s.current_activity.clone(),
                    })
                    .collect();
                activities.sort_by(|a, b| a.session_id.cmp(&b.session_id));

                UserSnapshot {
                    user_id: presence.user_id,
                    username: presence.username,
                    status: PresenceStatus::Online,
                    activities,
                }
            })
            .collect();
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));

        PresenceMessage::Snapshot { users }
    }

    /// Computes a snapshot and delivers it to one user's private queue,
    /// so late subscribers get current state instead of only future
    /// deltas.
    pub fn send_snapshot_to_user(&self, username: &str) {
        let snapshot = self.snapshot();
        self.sink.send_to_user(username, &snapshot);
        self.metrics.record_snapshot_sent();

        debug!(username = %username, "Presence snapshot sent");
    }

    /// Evicts every session whose heartbeat is older than the configured
    /// timeout, reusing the explicit-disconnect path so eviction is keyed
    /// by session id — a reconnect racing the sweep keeps its fresh
    /// session. Returns the number of sessions evicted.
    pub fn expire_stale(&self, now: DateTime<Utc>) -> usize {
        let stale = self.registry.stale_sessions(now, self.heartbeat_timeout);

        let mut expired = 0;
        for (user_id, session_ids) in stale {
            for session_id in session_ids {
                debug!(
                    session_id = %session_id,
                    user_id = %user_id,
                    "Expiring stale presence session"
                );
                self.metrics.record_session_expired();
                self.remove_session(&session_id);
                expired += 1;
            }
        }

        if expired > 0 {
            info!(count = expired, "Expired stale presence sessions");
        }
        expired
    }

    /// Presence status for one user.
    pub fn status_of(&self, user_id: &UserId) -> PresenceStatus {
        if self.registry.is_user_online(user_id) {
            PresenceStatus::Online
        } else {
            PresenceStatus::Offline
        }
    }

    /// Number of currently online users.
    pub fn online_user_count(&self) -> usize {
        self.registry.user_count()
    }

    /// Number of live sessions across all users.
    pub fn session_count(&self) -> usize {
        self.registry.session_count()
    }
}
