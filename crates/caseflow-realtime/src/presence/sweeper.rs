//! Periodic stale-session sweep.
//!
//! Reclaims sessions whose connection died without a clean disconnect
//! (network partition, crash). The task is owned by the engine: started
//! alongside the tracker, stopped through the shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;
use tracing::debug;

use super::tracker::PresenceTracker;

/// Runs the sweep loop until the cancel signal flips to `true`.
///
/// Each tick takes "now" once and evicts every session whose heartbeat is
/// older than the tracker's configured timeout.
pub async fn run_sweeper(
    tracker: Arc<PresenceTracker>,
    period: Duration,
    mut cancel: watch::Receiver<bool>,
) {
    let mut ticker = time::interval(period);
    // the first tick fires immediately; an empty sweep on startup is fine
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = cancel.changed() => {
                // a dropped sender means the engine is gone
                if changed.is_err() || *cancel.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                tracker.expire_stale(Utc::now());
            }
        }
    }

    debug!("Presence sweeper stopped");
}
