use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timer settings of the sync scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncTimings {
    /// Quiet time after the last local write before pushing
    pub debounce: Duration,
    /// Interval of the background pull
    pub poll_interval: Duration,
    /// A poll is skipped if a local write happened this recently
    pub quiet_period: Duration,
}

impl Default for SyncTimings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(2000),
            poll_interval: Duration::from_secs(30),
            quiet_period: Duration::from_millis(3500),
        }
    }
}

/// Which direction a sync attempt goes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Send local document (after local writes)
    Push,
    /// Fetch only (background poll)
    Pull,
    /// Let the adapter pick the newer side (enable, focus, manual)
    Full,
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncMode::Push => write!(f, "push"),
            SyncMode::Pull => write!(f, "pull"),
            SyncMode::Full => write!(f, "full"),
        }
    }
}

/// Current sync state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    #[default]
    Idle,
    Syncing,
    Synced,
    Error,
    Offline,
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncState::Idle => write!(f, "idle"),
            SyncState::Syncing => write!(f, "syncing"),
            SyncState::Synced => write!(f, "synced"),
            SyncState::Error => write!(f, "error"),
            SyncState::Offline => write!(f, "offline"),
        }
    }
}

/// Sync status shown by the status indicator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub state: SyncState,
    /// Error message if state is Error or Offline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Last successful sync timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<DateTime<Utc>>,
    /// Timestamp of the remote copy as reported by the adapter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_last_modified: Option<String>,
    /// Whether the cloud account was available at the last check
    pub cloud_available: bool,
}

/// How a sync attempt ended
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Another sync was in flight
    Skipped,
    Synced { updated_local: bool },
    Failed(String),
}
