//! Top-level presence engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use caseflow_core::config::realtime::RealtimeConfig;
use caseflow_core::error::AppError;

use crate::broadcast::memory::MemoryPubSub;
use crate::broadcast::sink::{BroadcastSink, PRESENCE_TOPIC};
use crate::message::types::SessionEvent;
use crate::metrics::{MetricsSnapshot, PresenceMetrics};
use crate::presence::sweeper::run_sweeper;
use crate::presence::tracker::PresenceTracker;

/// Central presence engine owning the tracker, the pub/sub fan-out, and
/// the sweeper task.
///
/// Constructed once at process start and injected into whatever consumes
/// connection events; a fresh instance per test gives a fully isolated
/// registry.
#[derive(Debug)]
pub struct PresenceEngine {
    /// Presence tracker.
    tracker: Arc<PresenceTracker>,
    /// In-memory pub/sub the tracker publishes into.
    pubsub: Arc<MemoryPubSub>,
    /// Metrics collector.
    metrics: Arc<PresenceMetrics>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Sweeper task handle, taken on shutdown.
    sweeper: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl PresenceEngine {
    /// Creates a new presence engine and starts its sweeper.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: RealtimeConfig) -> Self {
        let metrics = Arc::new(PresenceMetrics::new());
        let pubsub = Arc::new(MemoryPubSub::new(config.channel_buffer_size));
        let sink: Arc<dyn BroadcastSink> = pubsub.clone();
        let tracker = Arc::new(PresenceTracker::new(&config, sink, metrics.clone()));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sweeper = tokio::spawn(run_sweeper(
            tracker.clone(),
            config.sweep_interval(),
            shutdown_rx,
        ));

        info!(
            sweep_interval_seconds = config.sweep_interval_seconds,
            heartbeat_timeout_seconds = config.heartbeat_timeout_seconds,
            "Presence engine initialized"
        );

        Self {
            tracker,
            pubsub,
            metrics,
            shutdown_tx,
            sweeper: tokio::sync::Mutex::new(Some(sweeper)),
        }
    }

    /// Dispatches one transport event to the tracker.
    pub fn handle_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::Connected {
                session_id,
                user_id,
                username,
            } => {
                self.tracker
                    .register_session(session_id, user_id, &username);
            }
            SessionEvent::Disconnected { session_id } => {
                self.tracker.remove_session(&session_id);
            }
            SessionEvent::Subscribed {
                username,
                destination,
                ..
            } => {
                // only presence-topic subscribers get bootstrapped
                if destination == PRESENCE_TOPIC {
                    self.tracker.send_snapshot_to_user(&username);
                }
            }
            SessionEvent::Activity {
                session_id,
                activity,
            } => {
                self.tracker.update_activity(&session_id, activity);
            }
            SessionEvent::Heartbeat { session_id } => {
                self.tracker.handle_heartbeat(&session_id);
            }
        }
    }

    /// The presence tracker.
    pub fn tracker(&self) -> &Arc<PresenceTracker> {
        &self.tracker
    }

    /// The pub/sub fan-out, for the transport layer to subscribe clients.
    pub fn pubsub(&self) -> &Arc<MemoryPubSub> {
        &self.pubsub
    }

    /// A snapshot of the engine's metrics counters.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Initiates a graceful shutdown, stopping the sweeper.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down presence engine");

        let _ = self.shutdown_tx.send(true);

        if let Some(handle) = self.sweeper.lock().await.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Sweeper task ended abnormally");
            }
        }

        info!("Presence engine shut down");
        Ok(())
    }
}
