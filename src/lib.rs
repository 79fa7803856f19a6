use std::sync::Arc;

use thiserror::Error;

pub mod cloud;
pub mod config;
pub mod storage;
pub mod store;
pub mod sync;
pub mod tags;

#[cfg(test)]
mod testing;

use cloud::{CloudSync, FolderCloud, UnavailableCloud};
use config::{AppConfig, StorageBackend, SyncProvider};
use storage::{DataStore, FileStorage, HttpStorage, StorageError};
use store::Store;
use sync::{start_sync_scheduler, SyncEngine, SyncScheduler};

#[derive(Error, Debug)]
pub enum InitError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("The folder sync provider needs `sync.folder` to be set")]
    MissingSyncFolder,
}

pub struct AppState {
    pub store: Arc<Store>,
    pub engine: Arc<SyncEngine>,
    pub scheduler: SyncScheduler,
}

/// Pick the persistence backend named by the config
pub fn build_data_store(config: &AppConfig) -> Result<Arc<dyn DataStore>, InitError> {
    match config.storage.backend {
        StorageBackend::File => {
            let storage = FileStorage::new(config.data_dir()?);
            storage.init()?;
            Ok(Arc::new(storage))
        }
        StorageBackend::Http => Ok(Arc::new(HttpStorage::new(config.storage.url.clone())?)),
    }
}

/// Pick the cloud adapter named by the config
pub fn build_cloud(config: &AppConfig) -> Result<Arc<dyn CloudSync>, InitError> {
    match config.sync.provider {
        SyncProvider::None => Ok(Arc::new(UnavailableCloud)),
        SyncProvider::Folder => {
            let folder = config.sync.folder.clone().ok_or(InitError::MissingSyncFolder)?;
            Ok(Arc::new(FolderCloud::new(folder)))
        }
    }
}

/// Wire up the store, the sync engine and the scheduler, load the stored
/// document and resume syncing if it was left on. Must run inside a tokio
/// runtime.
pub async fn init(config: &AppConfig) -> Result<AppState, InitError> {
    let data_store = build_data_store(config)?;
    let cloud = build_cloud(config)?;

    let store = Arc::new(Store::new(data_store));
    store.load().await;
    if let Some(error) = store.error() {
        log::warn!("Starting with default data: {}", error);
    }

    let engine = Arc::new(SyncEngine::new(Arc::clone(&store), cloud));
    let scheduler = start_sync_scheduler(Arc::clone(&engine), Arc::clone(&store), config.sync.timings());

    Ok(AppState {
        store,
        engine,
        scheduler,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_config(temp: &TempDir) -> AppConfig {
        AppConfig {
            data_dir: Some(temp.path().to_path_buf()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_init_creates_first_run_document() {
        let temp = TempDir::new().unwrap();
        let state = init(&file_config(&temp)).await.unwrap();

        assert!(temp.path().join("boards.json").exists());
        assert_eq!(state.store.snapshot().boards[0].name, "My First Project");
        assert!(state.store.error().is_none());
        state.scheduler.shutdown();
    }

    #[tokio::test]
    async fn test_folder_provider_needs_folder() {
        let temp = TempDir::new().unwrap();
        let mut config = file_config(&temp);
        config.sync.provider = SyncProvider::Folder;

        assert!(matches!(init(&config).await, Err(InitError::MissingSyncFolder)));
    }
}
