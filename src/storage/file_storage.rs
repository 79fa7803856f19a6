use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use super::models::Document;
use super::DataStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

const DATA_FILE: &str = "boards.json";

/// Desktop persistence: one JSON document on disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join("carbon"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Ok(())
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    pub fn data_file_path(&self) -> PathBuf {
        self.base_path.join(DATA_FILE)
    }

    /// Read the stored document.
    ///
    /// A missing file yields the first-run document (written back for next
    /// time); an unreadable or unparseable file yields it too, leaving the
    /// bad file in place.
    pub fn read_document(&self) -> Result<Document> {
        let path = self.data_file_path();

        if !path.exists() {
            let document = Document::default_document();
            if let Err(e) = self.write_document(&document) {
                log::warn!("Failed to write initial data file {:?}: {}", path, e);
            }
            return Ok(document);
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                log::error!("Failed to read data file {:?}: {}", path, e);
                return Ok(Document::default_document());
            }
        };

        match Document::from_json(&content) {
            Ok(document) => Ok(document),
            Err(e) => {
                log::error!("Failed to parse data file {:?}: {}", path, e);
                // Keep the unreadable copy so the next save cannot destroy it
                let backup = path.with_extension("json.bad");
                match fs::copy(&path, &backup) {
                    Ok(_) => log::warn!("Kept unreadable data file as {:?}", backup),
                    Err(e) => log::error!("Failed to back up data file {:?}: {}", path, e),
                }
                Ok(Document::default_document())
            }
        }
    }

    /// Replace the stored document as a whole (temp file + rename)
    pub fn write_document(&self, document: &Document) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;

        let path = self.data_file_path();
        let tmp_path = path.with_extension("json.tmp");
        let content = document.to_json_pretty()?;

        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

#[async_trait]
impl DataStore for FileStorage {
    async fn read_data(&self) -> Result<Document> {
        self.read_document()
    }

    async fn write_data(&self, document: &Document) -> Result<bool> {
        self.write_document(document).map_err(|e| {
            log::error!("Failed to write data file: {}", e);
            e
        })?;
        Ok(true)
    }

    fn location(&self) -> String {
        self.data_file_path().to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{Bookmark, CustomTag, Note};
    use tempfile::TempDir;

    fn create_test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("carbon"));
        (storage, temp_dir)
    }

    #[test]
    fn test_missing_file_yields_default_and_creates_it() {
        let (storage, _temp) = create_test_storage();

        let doc = storage.read_document().unwrap();
        assert_eq!(doc.active_board.as_deref(), Some("default-board"));
        assert!(storage.data_file_path().exists());
    }

    #[test]
    fn test_corrupt_file_yields_default_and_is_backed_up() {
        let (storage, _temp) = create_test_storage();
        storage.init().unwrap();
        fs::write(storage.data_file_path(), "{ not json").unwrap();

        let doc = storage.read_document().unwrap();
        assert_eq!(doc.boards.len(), 1);
        assert_eq!(
            fs::read_to_string(storage.data_file_path()).unwrap(),
            "{ not json"
        );

        // A later save replaces boards.json but the backup survives
        storage.write_document(&doc).unwrap();
        let backup = storage.data_file_path().with_extension("json.bad");
        assert_eq!(fs::read_to_string(backup).unwrap(), "{ not json");
    }

    #[test]
    fn test_older_file_without_timestamps_still_loads() {
        let (storage, _temp) = create_test_storage();
        storage.init().unwrap();
        let legacy = r#"{
            "boards": [{"id": "b1", "name": "Real Work", "columns": [{"id": "c1", "title": "Doing", "cards": [{"id": "k1", "title": "Ship it", "priority": ""}]}]}],
            "activeBoard": "b1",
            "theme": null,
            "notes": [{"id": "n1", "title": "Plan", "content": "draft"}]
        }"#;
        fs::write(storage.data_file_path(), legacy).unwrap();

        let doc = storage.read_document().unwrap();
        assert_eq!(doc.boards[0].name, "Real Work");
        assert_eq!(doc.boards[0].columns[0].cards[0].title, "Ship it");
        assert_eq!(doc.notes[0].content, "draft");
        assert_eq!(doc.theme, "dark");
        assert!(!storage.data_file_path().with_extension("json.bad").exists());
    }

    #[tokio::test]
    async fn test_write_then_read_returns_same_document() {
        let (storage, _temp) = create_test_storage();

        let mut doc = Document::default_document();
        let mut bookmark = Bookmark::new("Rust".to_string(), "https://www.rust-lang.org".to_string());
        bookmark.tags = vec!["docs".to_string()];
        bookmark.order = Some(3);
        doc.bookmarks.push(bookmark);
        doc.notes.push(Note::new("Groceries".to_string(), "milk".to_string()));
        doc.custom_tags.insert(
            "side-project".to_string(),
            CustomTag {
                name: "Side Project".to_string(),
                color: "#22c55e".to_string(),
            },
        );
        doc.sync_enabled = true;
        doc.touch();

        assert!(storage.write_data(&doc).await.unwrap());
        let read = storage.read_data().await.unwrap();
        assert_eq!(read, doc);
    }

    #[test]
    fn test_location_points_at_data_file() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.location().ends_with("boards.json"));
    }
}
