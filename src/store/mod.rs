//! Client state store
//!
//! Single owner of the document. Every document mutator follows the same
//! path: build the next document on a private copy, swap it in, persist it,
//! then bump the write revision the sync scheduler listens to. Readers get
//! `Arc<Document>` snapshots that later commits never touch.

mod boards;
mod bookmarks;
mod collections;
mod filters;
mod folders;
mod notes;
mod tags;
mod view;

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::watch;

use crate::storage::{ActiveView, DataStore, Document};
use crate::sync::SyncStatus;

pub use bookmarks::{BookmarkUpdate, NewBookmark};
pub use boards::CardUpdate;
pub use collections::CollectionUpdate;
pub use filters::{filter_bookmarks, filter_notes, BookmarkStats};
pub use folders::FolderUpdate;
pub use notes::NoteUpdate;
pub use tags::TagUpdate;
pub use view::{SortBy, ViewState};

/// Validation failures reported back to the caller instead of panicking
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Tag already exists.")]
    TagExists,

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Default tags cannot be modified")]
    DefaultTag,

    #[error("Built-in collections cannot be modified")]
    BuiltinCollection,

    #[error("A folder needs at least two bookmarks")]
    FolderTooSmall,
}

struct StoreState {
    document: Arc<Document>,
    view: ViewState,
    sync: SyncStatus,
    error: Option<String>,
}

pub struct Store {
    state: Mutex<StoreState>,
    data_store: Arc<dyn DataStore>,
    /// Bumped after every local write; remote replacements do not bump it
    writes: watch::Sender<u64>,
}

impl Store {
    pub fn new(data_store: Arc<dyn DataStore>) -> Self {
        Self::with_document(data_store, Document::default())
    }

    pub fn with_document(data_store: Arc<dyn DataStore>, document: Document) -> Self {
        let (writes, _) = watch::channel(0);
        Self {
            state: Mutex::new(StoreState {
                document: Arc::new(document),
                view: ViewState::default(),
                sync: SyncStatus::default(),
                error: None,
            }),
            data_store,
            writes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Load the document from the data store. On failure the store keeps
    /// working on the first-run document and reports the error.
    pub async fn load(&self) {
        let (document, error) = match self.data_store.read_data().await {
            Ok(document) => (document, None),
            Err(e) => {
                log::error!("Failed to load data: {}", e);
                (
                    Document::default_document(),
                    Some(format!("Failed to load data: {}", e)),
                )
            }
        };

        log::info!(
            "Loaded {} board(s), {} bookmark(s), {} note(s) from {}",
            document.boards.len(),
            document.bookmarks.len(),
            document.notes.len(),
            self.data_store.location(),
        );

        let mut state = self.lock();
        state.document = Arc::new(document);
        state.error = error;
    }

    pub fn snapshot(&self) -> Arc<Document> {
        Arc::clone(&self.lock().document)
    }

    pub fn view(&self) -> ViewState {
        self.lock().view.clone()
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.lock().sync.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn data_location(&self) -> String {
        self.data_store.location()
    }

    pub fn sync_enabled(&self) -> bool {
        self.lock().document.sync_enabled
    }

    /// Revision counter of local writes
    pub fn subscribe_writes(&self) -> watch::Receiver<u64> {
        self.writes.subscribe()
    }

    pub(crate) fn update_sync_status(&self, f: impl FnOnce(&mut SyncStatus)) {
        f(&mut self.lock().sync);
    }

    fn update_view(&self, f: impl FnOnce(&mut ViewState)) {
        f(&mut self.lock().view);
    }

    /// Persist the current document as a local write
    pub async fn save_data(&self) {
        self.commit(|_| Some(())).await;
    }

    /// Take a newer remote document wholesale. The device keeps its own
    /// `active_view`; nothing else survives from the local copy.
    pub async fn apply_remote(&self, remote: Document) {
        let snapshot = {
            let mut state = self.lock();
            let mut next = remote;
            next.active_view = state.document.active_view;
            let next = Arc::new(next);
            state.document = Arc::clone(&next);
            next
        };

        log::info!("Applied remote document (lastModified {:?})", snapshot.last_modified);
        self.persist(&snapshot).await;
    }

    pub async fn set_sync_enabled(&self, enabled: bool) {
        self.commit(|doc| {
            doc.sync_enabled = enabled;
            Some(())
        })
        .await;
    }

    pub async fn set_active_view(&self, view: ActiveView) {
        self.commit(|doc| {
            doc.active_view = view;
            Some(())
        })
        .await;
    }

    pub async fn set_theme(&self, theme: &str) {
        let theme = theme.to_string();
        self.commit(move |doc| {
            doc.theme = theme;
            Some(())
        })
        .await;
    }

    /// Apply `f` to a copy of the document; `None` means nothing to do.
    pub(crate) async fn commit<R>(&self, f: impl FnOnce(&mut Document) -> Option<R>) -> Option<R> {
        match self.try_commit(|doc| Ok(f(doc))).await {
            Ok(out) => out,
            Err(_) => None,
        }
    }

    pub(crate) async fn try_commit<R>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<Option<R>, StoreError>,
    ) -> Result<Option<R>, StoreError> {
        let (out, snapshot) = {
            let mut state = self.lock();
            let mut next = Document::clone(&state.document);
            let Some(out) = f(&mut next)? else {
                return Ok(None);
            };
            next.touch();
            let next = Arc::new(next);
            state.document = Arc::clone(&next);
            (out, next)
        };

        self.persist(&snapshot).await;
        self.writes.send_modify(|rev| *rev += 1);
        Ok(Some(out))
    }

    /// Local state stays as committed even when the write fails
    async fn persist(&self, document: &Document) {
        match self.data_store.write_data(document).await {
            Ok(true) => {}
            Ok(false) => log::error!("Data store refused the write"),
            Err(e) => log::error!("Failed to save data: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingStore, MemoryStore};

    #[tokio::test]
    async fn test_load_failure_falls_back_to_default() {
        let store = Store::new(Arc::new(FailingStore));
        store.load().await;

        assert!(store.error().unwrap().starts_with("Failed to load data"));
        assert_eq!(store.snapshot().boards.len(), 1);
    }

    #[tokio::test]
    async fn test_write_persists_and_bumps_revision() {
        let data = Arc::new(MemoryStore::default());
        let store = Store::new(data.clone());
        let writes = store.subscribe_writes();

        store.set_theme("light").await;

        assert_eq!(*writes.borrow(), 1);
        assert_eq!(data.stored().unwrap().theme, "light");
        assert!(store.snapshot().last_modified.is_some());
    }

    #[tokio::test]
    async fn test_snapshots_are_not_mutated_by_later_writes() {
        let store = Store::new(Arc::new(MemoryStore::default()));
        let before = store.snapshot();

        store.set_theme("light").await;

        assert_eq!(before.theme, "dark");
        assert_eq!(store.snapshot().theme, "light");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_local_state() {
        let store = Store::new(Arc::new(FailingStore));

        store.set_theme("light").await;

        assert_eq!(store.snapshot().theme, "light");
    }

    #[tokio::test]
    async fn test_noop_does_not_write() {
        let data = Arc::new(MemoryStore::default());
        let store = Store::new(data.clone());
        let writes = store.subscribe_writes();

        assert!(!store.rename_board("missing", "x").await);

        assert_eq!(*writes.borrow(), 0);
        assert_eq!(data.write_count(), 0);
    }

    #[tokio::test]
    async fn test_apply_remote_keeps_active_view_only() {
        let data = Arc::new(MemoryStore::default());
        let store = Store::with_document(data.clone(), Document::default_document());
        store.set_active_view(ActiveView::Notes).await;
        let writes = store.subscribe_writes();
        let revision = *writes.borrow();

        let mut remote = Document::default();
        remote.theme = "light".to_string();
        remote.active_view = ActiveView::Bookmarks;
        remote.sync_enabled = true;
        store.apply_remote(remote.clone()).await;

        let mut expected = remote;
        expected.active_view = ActiveView::Notes;
        assert_eq!(*store.snapshot(), expected);
        assert_eq!(data.stored().unwrap(), expected);
        assert_eq!(*writes.borrow(), revision);
    }
}
