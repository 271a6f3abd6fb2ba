//! Real-time presence engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time presence engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Interval in seconds between stale-session sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Age in seconds after which a silent session is treated as dead.
    ///
    /// Must be comfortably larger than the client heartbeat interval so a
    /// transiently delayed heartbeat does not evict a live session.
    #[serde(default = "default_heartbeat_timeout")]
    pub heartbeat_timeout_seconds: u64,
    /// Internal buffer size for broadcast channels.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
}

impl RealtimeConfig {
    /// The sweep period as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// The heartbeat staleness threshold as a [`chrono::Duration`].
    pub fn heartbeat_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.heartbeat_timeout_seconds as i64)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: default_sweep_interval(),
            heartbeat_timeout_seconds: default_heartbeat_timeout(),
            channel_buffer_size: default_channel_buffer(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_heartbeat_timeout() -> u64 {
    90
}

fn default_channel_buffer() -> usize {
    256
}
