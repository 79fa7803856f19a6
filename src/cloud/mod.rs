//! Cloud sync adapters
//!
//! The adapter owns the conflict decision: it compares timestamps and tells
//! the caller through `should_update_local` whether the remote copy wins.

mod folder;
mod models;

use async_trait::async_trait;

use crate::storage::Document;

pub use folder::FolderCloud;
pub use models::{AccountStatus, AccountStatusResult, SyncResult};

pub const CLOUD_UNAVAILABLE_MSG: &str = "Cloud sync is not available on this platform";

#[async_trait]
pub trait CloudSync: Send + Sync {
    async fn account_status(&self) -> AccountStatusResult;

    /// Send the local document; may answer with a newer remote one instead
    async fn push(&self, document: &Document) -> SyncResult;

    /// Fetch the remote document if it is newer than what this device has seen
    async fn pull(&self) -> SyncResult;

    /// Push or pull depending on which side is newer
    async fn sync_bidirectional(&self, document: &Document) -> SyncResult;

    /// Remove every trace of the app's data from the cloud
    async fn delete_remote_data(&self) -> bool;
}

/// Adapter used where no cloud service exists
pub struct UnavailableCloud;

#[async_trait]
impl CloudSync for UnavailableCloud {
    async fn account_status(&self) -> AccountStatusResult {
        AccountStatusResult::unavailable(AccountStatus::Error, CLOUD_UNAVAILABLE_MSG)
    }

    async fn push(&self, _document: &Document) -> SyncResult {
        SyncResult::failure(CLOUD_UNAVAILABLE_MSG)
    }

    async fn pull(&self) -> SyncResult {
        SyncResult::failure(CLOUD_UNAVAILABLE_MSG)
    }

    async fn sync_bidirectional(&self, _document: &Document) -> SyncResult {
        SyncResult::failure(CLOUD_UNAVAILABLE_MSG)
    }

    async fn delete_remote_data(&self) -> bool {
        false
    }
}
