use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::config::{SyncMode, SyncOutcome, SyncState};
use crate::cloud::CloudSync;
use crate::storage::Document;
use crate::store::Store;

/// Runs one sync attempt at a time against the cloud adapter and applies
/// the adapter's verdict to the store.
pub struct SyncEngine {
    store: Arc<Store>,
    cloud: Arc<dyn CloudSync>,
    busy: AtomicBool,
}

/// Clears the busy flag when the attempt ends, however it ends
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SyncEngine {
    pub fn new(store: Arc<Store>, cloud: Arc<dyn CloudSync>) -> Self {
        Self {
            store,
            cloud,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Ask the adapter whether the account can sync. Records the answer in
    /// the sync status; an unavailable account puts sync offline.
    pub async fn check_account(&self) -> bool {
        let account = self.cloud.account_status().await;
        log::debug!("Sync: account status {}", account.status);

        self.store.update_sync_status(|status| {
            status.cloud_available = account.available;
            if !account.available {
                status.state = SyncState::Offline;
                status.error = account.error.clone();
            } else if status.state == SyncState::Offline {
                status.state = SyncState::Idle;
                status.error = None;
            }
        });
        account.available
    }

    pub async fn run(&self, mode: SyncMode) -> SyncOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!("Sync: {} skipped, another sync is in flight", mode);
            return SyncOutcome::Skipped;
        }
        let _guard = BusyGuard(&self.busy);

        self.store.update_sync_status(|status| {
            status.state = SyncState::Syncing;
            status.error = None;
        });

        let local = self.store.snapshot();
        let result = match mode {
            SyncMode::Push => self.cloud.push(&local).await,
            SyncMode::Pull => self.cloud.pull().await,
            SyncMode::Full => self.cloud.sync_bidirectional(&local).await,
        };

        if !result.success {
            let message = result.error.unwrap_or_else(|| "Sync failed".to_string());
            log::warn!("Sync: {} failed: {}", mode, message);
            self.fail(&message);
            return SyncOutcome::Failed(message);
        }

        let mut updated_local = false;
        if result.should_update_local {
            if let Some(data) = &result.data {
                match Document::from_json(data) {
                    Ok(remote) => {
                        self.store.apply_remote(remote).await;
                        updated_local = true;
                    }
                    Err(e) => {
                        log::error!("Sync: failed to parse remote data: {}", e);
                        let message = "Failed to parse remote data".to_string();
                        self.fail(&message);
                        return SyncOutcome::Failed(message);
                    }
                }
            }
        }

        self.store.update_sync_status(|status| {
            status.state = SyncState::Synced;
            status.error = None;
            status.last_synced = Some(Utc::now());
            if result.remote_last_modified.is_some() {
                status.remote_last_modified = result.remote_last_modified.clone();
            }
        });
        log::info!("Sync: {} complete (updated local: {})", mode, updated_local);

        SyncOutcome::Synced { updated_local }
    }

    /// Remove the synced copy from the cloud
    pub async fn delete_remote_data(&self) -> bool {
        let deleted = self.cloud.delete_remote_data().await;
        if deleted {
            log::info!("Sync: remote data deleted");
            self.store.update_sync_status(|status| status.remote_last_modified = None);
        } else {
            log::warn!("Sync: failed to delete remote data");
        }
        deleted
    }

    fn fail(&self, message: &str) {
        self.store.update_sync_status(|status| {
            status.state = SyncState::Error;
            status.error = Some(message.to_string());
        });
    }
}
