mod file_storage;
mod http_storage;
mod models;

use async_trait::async_trait;

pub use file_storage::{FileStorage, StorageError};
pub use http_storage::HttpStorage;
pub use models::*;

/// Whole-document persistence. Implementations replace the stored document
/// atomically on write and never interpret its contents.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn read_data(&self) -> Result<Document, StorageError>;

    async fn write_data(&self, document: &Document) -> Result<bool, StorageError>;

    /// Human-readable location of the stored document (file path or URL)
    fn location(&self) -> String;
}
