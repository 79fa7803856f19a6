//! Test doubles shared by the unit tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::cloud::{AccountStatus, AccountStatusResult, CloudSync, SyncResult};
use crate::storage::{DataStore, Document, StorageError};

/// Keeps the last written document in memory
#[derive(Default)]
pub struct MemoryStore {
    document: Mutex<Option<Document>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn stored(&self) -> Option<Document> {
        self.document.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn read_data(&self) -> Result<Document, StorageError> {
        Ok(self.stored().unwrap_or_else(Document::default_document))
    }

    async fn write_data(&self, document: &Document) -> Result<bool, StorageError> {
        *self.document.lock().unwrap() = Some(document.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Every call fails
pub struct FailingStore;

#[async_trait]
impl DataStore for FailingStore {
    async fn read_data(&self) -> Result<Document, StorageError> {
        Err(StorageError::DataDirNotFound)
    }

    async fn write_data(&self, _document: &Document) -> Result<bool, StorageError> {
        Err(StorageError::DataDirNotFound)
    }

    fn location(&self) -> String {
        "nowhere".to_string()
    }
}

/// Cloud adapter answering from a queue of canned results (plain success
/// once the queue is empty) and counting calls per kind
pub struct ScriptedCloud {
    account: Mutex<AccountStatusResult>,
    responses: Mutex<VecDeque<SyncResult>>,
    delay: Mutex<Duration>,
    pushes: AtomicUsize,
    pulls: AtomicUsize,
    fulls: AtomicUsize,
    delete_fails: AtomicBool,
}

impl Default for ScriptedCloud {
    fn default() -> Self {
        Self {
            account: Mutex::new(AccountStatusResult::available()),
            responses: Mutex::new(VecDeque::new()),
            delay: Mutex::new(Duration::ZERO),
            pushes: AtomicUsize::new(0),
            pulls: AtomicUsize::new(0),
            fulls: AtomicUsize::new(0),
            delete_fails: AtomicBool::new(false),
        }
    }
}

impl ScriptedCloud {
    pub fn respond_with(&self, result: SyncResult) {
        self.responses.lock().unwrap().push_back(result);
    }

    pub fn set_unavailable(&self) {
        *self.account.lock().unwrap() =
            AccountStatusResult::unavailable(AccountStatus::NoAccount, "Not signed in");
    }

    /// Make every call take this long
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Make `delete_remote_data` report failure
    pub fn set_delete_fails(&self) {
        self.delete_fails.store(true, Ordering::SeqCst);
    }

    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    pub fn pull_count(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    pub fn full_count(&self) -> usize {
        self.fulls.load(Ordering::SeqCst)
    }

    async fn answer(&self, counter: &AtomicUsize) -> SyncResult {
        counter.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(SyncResult::ok)
    }
}

#[async_trait]
impl CloudSync for ScriptedCloud {
    async fn account_status(&self) -> AccountStatusResult {
        self.account.lock().unwrap().clone()
    }

    async fn push(&self, _document: &Document) -> SyncResult {
        self.answer(&self.pushes).await
    }

    async fn pull(&self) -> SyncResult {
        self.answer(&self.pulls).await
    }

    async fn sync_bidirectional(&self, _document: &Document) -> SyncResult {
        self.answer(&self.fulls).await
    }

    async fn delete_remote_data(&self) -> bool {
        !self.delete_fails.load(Ordering::SeqCst)
    }
}
