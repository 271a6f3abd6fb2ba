//! Session registry — the single source of truth for who is connected.
//!
//! Two concurrent maps: a forward index from user to their
//! [`UserPresence`] and a reverse index from session id to owning user.
//! Most transport events carry only a session id, so the reverse index
//! gives O(1) lookup for the common case. Removal is always keyed by
//! session id, never positional.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use caseflow_core::types::{SessionId, UserId};
use caseflow_entity::presence::Activity;

use super::session::{SessionState, UserPresence};

/// Result of removing a session from the registry.
#[derive(Debug)]
pub struct RemovedSession {
    /// The removed session state, with `connected` flipped off.
    pub session: SessionState,
    /// Whether this was the user's last session.
    pub went_offline: bool,
}

/// Thread-safe registry of all live sessions, indexed both ways.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// User id → presence record with that user's session map.
    by_user: DashMap<UserId, UserPresence>,
    /// Session id → owning user id (reverse index).
    by_session: DashMap<SessionId, UserId>,
}

impl SessionRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            by_user: DashMap::new(),
            by_session: DashMap::new(),
        }
    }

    /// Inserts a fresh idle session for a user, creating the
    /// [`UserPresence`] lazily.
    ///
    /// Re-registering a known session id silently overwrites; if the id
    /// was owned by a different user, the stale entry is detached so a
    /// session id maps to at most one user at a time.
    pub fn insert(&self, session_id: SessionId, user_id: UserId, username: &str) {
        self.by_user
            .entry(user_id.clone())
            .or_insert_with(|| UserPresence::new(user_id.clone(), username.to_string()))
            .sessions
            .insert(
                session_id.clone(),
                SessionState::new(session_id.clone(), user_id.clone(), username.to_string()),
            );

        if let Some(previous_owner) = self.by_session.insert(session_id.clone(), user_id.clone()) {
            if previous_owner != user_id {
                self.detach(&previous_owner, &session_id);
            }
        }
    }

    /// Removes a session, pruning the owning [`UserPresence`] if it was
    /// the last one. Unknown session ids return `None`.
    pub fn remove(&self, session_id: &SessionId) -> Option<RemovedSession> {
        let (_, user_id) = self.by_session.remove(session_id)?;

        let mut removed = None;
        let mut emptied = false;
        if let Some(mut presence) = self.by_user.get_mut(&user_id) {
            removed = presence.sessions.remove(session_id);
            emptied = presence.sessions.is_empty();
        }

        let mut went_offline = false;
        if emptied {
            // re-check under the entry lock: a concurrent register may have
            // added a new session since we released the guard
            went_offline = self
                .by_user
                .remove_if(&user_id, |_, presence| presence.sessions.is_empty())
                .is_some();
        }

        let mut session = removed?;
        session.connected = false;
        Some(RemovedSession {
            session,
            went_offline,
        })
    }

    /// Replaces a session's activity and bumps its heartbeat. Returns the
    /// owning user id, or `None` for unknown sessions.
    pub fn set_activity(
        &self,
        session_id: &SessionId,
        activity: Activity,
        now: DateTime<Utc>,
    ) -> Option<UserId> {
        let user_id = self.owner_of(session_id)?;
        let mut presence = self.by_user.get_mut(&user_id)?;
        let session = presence.sessions.get_mut(session_id)?;
        session.set_activity(activity, now);
        Some(user_id)
    }

    /// Bumps a session's heartbeat. Returns whether the session was known.
    pub fn touch(&self, session_id: &SessionId, now: DateTime<Utc>) -> bool {
        let Some(user_id) = self.owner_of(session_id) else {
            return false;
        };
        let Some(mut presence) = self.by_user.get_mut(&user_id) else {
            return false;
        };
        match presence.sessions.get_mut(session_id) {
            Some(session) => {
                session.touch(now);
                true
            }
            None => false,
        }
    }

    /// Looks up the user owning a session.
    pub fn owner_of(&self, session_id: &SessionId) -> Option<UserId> {
        self.by_session.get(session_id).map(|r| r.value().clone())
    }

    /// Whether a user currently has at least one session.
    pub fn is_user_online(&self, user_id: &UserId) -> bool {
        self.by_user.contains_key(user_id)
    }

    /// Number of currently online users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Number of live sessions across all users.
    pub fn session_count(&self) -> usize {
        self.by_session.len()
    }

    /// Clones the presence record of every online user.
    pub fn snapshot_users(&self) -> Vec<UserPresence> {
        self.by_user.iter().map(|r| r.value().clone()).collect()
    }

    /// Collects sessions whose heartbeat is older than `timeout`, grouped
    /// per user so eviction can be isolated per user.
    pub fn stale_sessions(
        &self,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> Vec<(UserId, Vec<SessionId>)> {
        self.by_user
            .iter()
            .filter_map(|entry| {
                let stale: Vec<SessionId> = entry
                    .value()
                    .sessions
                    .values()
                    .filter(|s| s.is_stale(now, timeout))
                    .map(|s| s.session_id.clone())
                    .collect();
                if stale.is_empty() {
                    None
                } else {
                    Some((entry.key().clone(), stale))
                }
            })
            .collect()
    }

    /// Removes a session from a specific user's map, pruning the user if
    /// emptied. Used when a reused session id is detached from its
    /// previous owner; emits no removal result.
    fn detach(&self, user_id: &UserId, session_id: &SessionId) {
        let mut emptied = false;
        if let Some(mut presence) = self.by_user.get_mut(user_id) {
            presence.sessions.remove(session_id);
            emptied = presence.sessions.is_empty();
        }
        if emptied {
            self.by_user
                .remove_if(user_id, |_, presence| presence.sessions.is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SessionRegistry {
        SessionRegistry::new()
    }

    #[test]
    fn test_insert_and_reverse_lookup() {
        let reg = registry();
        reg.insert(SessionId::new("s1"), UserId::new("u1"), "alice");

        assert_eq!(reg.owner_of(&SessionId::new("s1")), Some(UserId::new("u1")));
        assert_eq!(reg.user_count(), 1);
        assert_eq!(reg.session_count(), 1);
    }

    #[test]
    fn test_remove_last_session_prunes_user() {
        let reg = registry();
        reg.insert(SessionId::new("s1"), UserId::new("u1"), "alice");

        let removed = reg.remove(&SessionId::new("s1")).expect("removed");
        assert!(removed.went_offline);
        assert!(!removed.session.connected);
        assert_eq!(reg.user_count(), 0);
        assert_eq!(reg.session_count(), 0);
    }

    #[test]
    fn test_remove_non_last_session_keeps_user() {
        let reg = registry();
        reg.insert(SessionId::new("s1"), UserId::new("u1"), "alice");
        reg.insert(SessionId::new("s2"), UserId::new("u1"), "alice");

        let removed = reg.remove(&SessionId::new("s1")).expect("removed");
        assert!(!removed.went_offline);
        assert!(reg.is_user_online(&UserId::new("u1")));
        assert_eq!(reg.session_count(), 1);
    }

    #[test]
    fn test_remove_unknown_is_none() {
        let reg = registry();
        assert!(reg.remove(&SessionId::new("ghost")).is_none());
    }

    #[test]
    fn test_reused_session_id_detaches_previous_owner() {
        let reg = registry();
        reg.insert(SessionId::new("s1"), UserId::new("u1"), "alice");
        reg.insert(SessionId::new("s1"), UserId::new("u2"), "bob");

        assert_eq!(reg.owner_of(&SessionId::new("s1")), Some(UserId::new("u2")));
        assert!(!reg.is_user_online(&UserId::new("u1")));
        assert_eq!(reg.session_count(), 1);
    }

    #[test]
    fn test_stale_sessions_grouped_by_user() {
        let reg = registry();
        reg.insert(SessionId::new("s1"), UserId::new("u1"), "alice");
        reg.insert(SessionId::new("s2"), UserId::new("u2"), "bob");
        reg.touch(&SessionId::new("s2"), Utc::now() + Duration::seconds(120));

        let stale = reg.stale_sessions(Utc::now() + Duration::seconds(120), Duration::seconds(90));
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].0, UserId::new("u1"));
        assert_eq!(stale[0].1, vec![SessionId::new("s1")]);
    }
}
