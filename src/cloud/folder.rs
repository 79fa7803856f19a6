use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{AccountStatus, AccountStatusResult, SyncResult};
use super::CloudSync;
use crate::storage::Document;

const RECORD_FILE: &str = "carbon-sync.json";

/// What is stored in the shared folder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteRecord {
    /// Serialized document
    data: String,
    #[serde(default)]
    last_modified: Option<DateTime<Utc>>,
}

/// Sync through a directory that some other service (a synced drive, a
/// network share) replicates between devices.
pub struct FolderCloud {
    folder: PathBuf,
    /// Newest remote timestamp this device has pushed or taken
    known: Mutex<Option<DateTime<Utc>>>,
}

impl FolderCloud {
    pub fn new(folder: PathBuf) -> Self {
        Self {
            folder,
            known: Mutex::new(None),
        }
    }

    fn record_path(&self) -> PathBuf {
        self.folder.join(RECORD_FILE)
    }

    fn remember(&self, timestamp: Option<DateTime<Utc>>) {
        let mut known = self.known.lock().unwrap_or_else(|e| e.into_inner());
        if timestamp > *known {
            *known = timestamp;
        }
    }

    fn known(&self) -> Option<DateTime<Utc>> {
        *self.known.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn read_record(&self) -> Result<Option<RemoteRecord>, String> {
        let path = self.record_path();
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)
                .map(Some)
                .map_err(|e| format!("Invalid sync record {:?}: {}", path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(format!("Failed to read {:?}: {}", path, e)),
        }
    }

    async fn write_record(&self, document: &Document) -> Result<(), String> {
        let data = serde_json::to_string(document).map_err(|e| e.to_string())?;
        let record = RemoteRecord {
            data,
            last_modified: document.last_modified,
        };
        let content = serde_json::to_string_pretty(&record).map_err(|e| e.to_string())?;

        let path = self.record_path();
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|e| format!("Failed to write {:?}: {}", tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| format!("Failed to replace {:?}: {}", path, e))?;

        self.remember(document.last_modified);
        Ok(())
    }

    fn take_remote(&self, record: RemoteRecord) -> SyncResult {
        self.remember(record.last_modified);
        SyncResult::update_local(
            record.data,
            record.last_modified.map(|t| t.to_rfc3339()),
        )
    }

    fn folder_missing(&self) -> SyncResult {
        SyncResult::failure(format!("Sync folder not found: {}", self.folder.display()))
    }
}

#[async_trait]
impl CloudSync for FolderCloud {
    async fn account_status(&self) -> AccountStatusResult {
        match tokio::fs::metadata(&self.folder).await {
            Ok(meta) if meta.is_dir() => AccountStatusResult::available(),
            Ok(_) => AccountStatusResult::unavailable(
                AccountStatus::Error,
                format!("Sync path is not a directory: {}", self.folder.display()),
            ),
            Err(_) => AccountStatusResult::unavailable(
                AccountStatus::NoAccount,
                format!("Sync folder not found: {}", self.folder.display()),
            ),
        }
    }

    async fn push(&self, document: &Document) -> SyncResult {
        if !self.folder.is_dir() {
            return self.folder_missing();
        }

        match self.read_record().await {
            Ok(Some(record)) if record.last_modified > document.last_modified => {
                log::info!("Folder sync: remote copy is newer than the pushed document");
                self.take_remote(record)
            }
            Ok(_) => match self.write_record(document).await {
                Ok(()) => SyncResult::ok(),
                Err(e) => SyncResult::failure(e),
            },
            Err(e) => SyncResult::failure(e),
        }
    }

    async fn pull(&self) -> SyncResult {
        if !self.folder.is_dir() {
            return self.folder_missing();
        }

        match self.read_record().await {
            Ok(None) => SyncResult::ok(),
            Ok(Some(record)) if record.last_modified > self.known() => self.take_remote(record),
            Ok(Some(record)) => SyncResult {
                remote_last_modified: record.last_modified.map(|t| t.to_rfc3339()),
                ..SyncResult::ok()
            },
            Err(e) => SyncResult::failure(e),
        }
    }

    async fn sync_bidirectional(&self, document: &Document) -> SyncResult {
        if !self.folder.is_dir() {
            return self.folder_missing();
        }

        let record = match self.read_record().await {
            Ok(record) => record,
            Err(e) => return SyncResult::failure(e),
        };

        match record {
            Some(record) if record.last_modified > document.last_modified => self.take_remote(record),
            Some(record) if record.last_modified == document.last_modified => {
                self.remember(record.last_modified);
                SyncResult {
                    remote_last_modified: record.last_modified.map(|t| t.to_rfc3339()),
                    ..SyncResult::ok()
                }
            }
            _ => match self.write_record(document).await {
                Ok(()) => SyncResult::ok(),
                Err(e) => SyncResult::failure(e),
            },
        }
    }

    async fn delete_remote_data(&self) -> bool {
        match tokio::fs::remove_file(self.record_path()).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                log::error!("Folder sync: failed to delete remote data: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn document_at(offset_secs: i64, theme: &str) -> Document {
        let mut doc = Document::default_document();
        doc.theme = theme.to_string();
        doc.last_modified = Some(
            DateTime::parse_from_rfc3339("2026-03-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc)
                + Duration::seconds(offset_secs),
        );
        doc
    }

    #[tokio::test]
    async fn test_pull_from_empty_folder_has_no_data() {
        let temp = TempDir::new().unwrap();
        let cloud = FolderCloud::new(temp.path().to_path_buf());

        let result = cloud.pull().await;
        assert!(result.success);
        assert!(result.data.is_none());
        assert!(!result.should_update_local);
    }

    #[tokio::test]
    async fn test_other_device_pulls_pushed_document() {
        let temp = TempDir::new().unwrap();
        let laptop = FolderCloud::new(temp.path().to_path_buf());
        let desktop = FolderCloud::new(temp.path().to_path_buf());

        assert!(laptop.push(&document_at(0, "light")).await.success);

        let result = desktop.pull().await;
        assert!(result.success && result.should_update_local);
        let doc = Document::from_json(result.data.as_deref().unwrap()).unwrap();
        assert_eq!(doc.theme, "light");

        // Nothing new the second time
        let again = desktop.pull().await;
        assert!(again.success && !again.should_update_local);
    }

    #[tokio::test]
    async fn test_stale_push_gets_remote_instead() {
        let temp = TempDir::new().unwrap();
        let laptop = FolderCloud::new(temp.path().to_path_buf());
        let desktop = FolderCloud::new(temp.path().to_path_buf());

        assert!(laptop.push(&document_at(60, "light")).await.success);

        let result = desktop.push(&document_at(0, "dark")).await;
        assert!(result.success && result.should_update_local);
        let doc = Document::from_json(result.data.as_deref().unwrap()).unwrap();
        assert_eq!(doc.theme, "light");
    }

    #[tokio::test]
    async fn test_bidirectional_picks_newer_side() {
        let temp = TempDir::new().unwrap();
        let cloud = FolderCloud::new(temp.path().to_path_buf());

        // No remote yet: local is written
        let first = cloud.sync_bidirectional(&document_at(0, "dark")).await;
        assert!(first.success && !first.should_update_local);

        // Local newer: overwritten
        let second = cloud.sync_bidirectional(&document_at(30, "light")).await;
        assert!(second.success && !second.should_update_local);

        // Local older: remote wins
        let third = cloud.sync_bidirectional(&document_at(10, "dark")).await;
        assert!(third.should_update_local);
        let doc = Document::from_json(third.data.as_deref().unwrap()).unwrap();
        assert_eq!(doc.theme, "light");

        // Same timestamp: nothing to do
        let fourth = cloud.sync_bidirectional(&document_at(30, "light")).await;
        assert!(fourth.success && !fourth.should_update_local);
    }

    #[tokio::test]
    async fn test_missing_folder_reports_no_account() {
        let temp = TempDir::new().unwrap();
        let cloud = FolderCloud::new(temp.path().join("nope"));

        let status = cloud.account_status().await;
        assert!(!status.available);
        assert_eq!(status.status, AccountStatus::NoAccount);
        assert!(!cloud.push(&document_at(0, "dark")).await.success);
    }

    #[tokio::test]
    async fn test_delete_remote_data() {
        let temp = TempDir::new().unwrap();
        let cloud = FolderCloud::new(temp.path().to_path_buf());
        cloud.push(&document_at(0, "dark")).await;

        assert!(cloud.delete_remote_data().await);
        assert!(!temp.path().join(RECORD_FILE).exists());
    }
}
