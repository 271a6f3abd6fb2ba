//! Presence engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct PresenceMetrics {
    /// Total sessions registered
    pub sessions_opened: AtomicU64,
    /// Total sessions removed (disconnect or expiry)
    pub sessions_closed: AtomicU64,
    /// Sessions removed by the sweeper
    pub sessions_expired: AtomicU64,
    /// Total activity updates broadcast
    pub activity_updates: AtomicU64,
    /// Total heartbeats recorded
    pub heartbeats: AtomicU64,
    /// Total snapshots delivered to private queues
    pub snapshots_sent: AtomicU64,
}

impl PresenceMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a session registration
    pub fn record_session_opened(&self) {
        self.sessions_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a session removal
    pub fn record_session_closed(&self) {
        self.sessions_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a sweeper eviction
    pub fn record_session_expired(&self) {
        self.sessions_expired.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an activity update
    pub fn record_activity_update(&self) {
        self.activity_updates.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a heartbeat
    pub fn record_heartbeat(&self) {
        self.heartbeats.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a snapshot delivery
    pub fn record_snapshot_sent(&self) {
        self.snapshots_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sessions_opened: self.sessions_opened.load(Ordering::Relaxed),
            sessions_closed: self.sessions_closed.load(Ordering::Relaxed),
            sessions_expired: self.sessions_expired.load(Ordering::Relaxed),
            activity_updates: self.activity_updates.load(Ordering::Relaxed),
            heartbeats: self.heartbeats.load(Ordering::Relaxed),
            snapshots_sent: self.snapshots_sent.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total sessions registered
    pub sessions_opened: u64,
    /// Total sessions removed
    pub sessions_closed: u64,
    /// Sessions removed by the sweeper
    pub sessions_expired: u64,
    /// Total activity updates broadcast
    pub activity_updates: u64,
    /// Total heartbeats recorded
    pub heartbeats: u64,
    /// Total snapshots delivered
    pub snapshots_sent: u64,
}
