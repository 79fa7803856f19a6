use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use super::config::{SyncMode, SyncState, SyncTimings};
use super::engine::SyncEngine;
use crate::store::Store;

/// Messages to control the sync scheduler
#[derive(Debug)]
pub enum SyncSchedulerMessage {
    /// User turned sync on
    EnableSync,
    /// User turned sync off
    DisableSync,
    /// App window regained focus or the machine woke up
    WindowFocused,
    /// Manual "sync now"
    SyncNow,
    /// App closing
    Shutdown,
}

/// Handle for the sync scheduler task
pub struct SyncScheduler {
    sender: mpsc::Sender<SyncSchedulerMessage>,
}

impl SyncScheduler {
    pub fn enable_sync(&self) {
        self.send(SyncSchedulerMessage::EnableSync);
    }

    pub fn disable_sync(&self) {
        self.send(SyncSchedulerMessage::DisableSync);
    }

    pub fn window_focused(&self) {
        self.send(SyncSchedulerMessage::WindowFocused);
    }

    pub fn sync_now(&self) {
        self.send(SyncSchedulerMessage::SyncNow);
    }

    /// Shut down the scheduler
    pub fn shutdown(&self) {
        self.send(SyncSchedulerMessage::Shutdown);
    }

    fn send(&self, message: SyncSchedulerMessage) {
        if let Err(e) = self.sender.try_send(message) {
            log::warn!("Sync scheduler: dropped message: {}", e);
        }
    }
}

/// Start the sync scheduler.
///
/// Spawns a loop that turns local writes into debounced pushes, polls the
/// cloud for remote changes while sync is enabled, and reacts to the
/// control messages of the returned handle. If the loaded document already
/// has sync enabled, syncing resumes right away.
pub fn start_sync_scheduler(
    engine: Arc<SyncEngine>,
    store: Arc<Store>,
    timings: SyncTimings,
) -> SyncScheduler {
    let (tx, rx) = mpsc::channel(32);
    let writes = store.subscribe_writes();

    tokio::spawn(async move {
        let mut scheduler = SchedulerLoop {
            engine,
            store,
            timings,
            writes,
            active: false,
            push_deadline: None,
            poll: None,
            last_write: None,
        };
        scheduler.run(rx).await;
    });

    SyncScheduler { sender: tx }
}

struct SchedulerLoop {
    engine: Arc<SyncEngine>,
    store: Arc<Store>,
    timings: SyncTimings,
    writes: watch::Receiver<u64>,
    /// Sync is enabled and the timers are running
    active: bool,
    push_deadline: Option<Instant>,
    poll: Option<Interval>,
    last_write: Option<Instant>,
}

/// Next poll tick, or never when polling is stopped
async fn tick(poll: &mut Option<Interval>) {
    match poll {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

impl SchedulerLoop {
    async fn run(&mut self, mut receiver: mpsc::Receiver<SyncSchedulerMessage>) {
        log::info!("Sync scheduler started");

        if self.store.sync_enabled() {
            log::info!("Sync scheduler: sync was enabled, resuming");
            self.activate();
        }

        loop {
            let deadline = self.push_deadline;

            tokio::select! {
                changed = self.writes.changed() => {
                    if changed.is_err() {
                        log::info!("Sync scheduler: store dropped, shutting down");
                        break;
                    }
                    self.writes.borrow_and_update();
                    self.on_local_write();
                }

                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.on_push_deadline();
                }

                _ = tick(&mut self.poll) => {
                    self.on_poll();
                }

                msg = receiver.recv() => {
                    match msg {
                        Some(SyncSchedulerMessage::EnableSync) => self.enable().await,
                        Some(SyncSchedulerMessage::DisableSync) => self.disable().await,
                        Some(SyncSchedulerMessage::WindowFocused) => self.on_focus(),
                        Some(SyncSchedulerMessage::SyncNow) => {
                            if self.active {
                                log::info!("Sync scheduler: manual sync requested");
                                self.spawn_sync(SyncMode::Full);
                            } else {
                                log::info!("Sync scheduler: manual sync ignored, sync is disabled");
                            }
                        }
                        Some(SyncSchedulerMessage::Shutdown) | None => {
                            log::info!("Sync scheduler: shutting down");
                            break;
                        }
                    }
                }
            }
        }
    }

    fn on_local_write(&mut self) {
        let now = Instant::now();
        self.last_write = Some(now);
        if self.active {
            self.push_deadline = Some(now + self.timings.debounce);
        }
    }

    fn on_push_deadline(&mut self) {
        if self.engine.is_busy() {
            log::debug!("Sync scheduler: sync in flight, postponing push");
            self.push_deadline = Some(Instant::now() + self.timings.debounce);
            return;
        }
        self.push_deadline = None;
        self.spawn_sync(SyncMode::Push);
    }

    fn on_poll(&mut self) {
        let recently_written = self
            .last_write
            .is_some_and(|at| at.elapsed() < self.timings.quiet_period);
        if recently_written || self.engine.is_busy() {
            log::debug!("Sync scheduler: skipping poll");
            return;
        }
        self.spawn_sync(SyncMode::Pull);
    }

    fn on_focus(&mut self) {
        let engine = self.engine.clone();
        let active = self.active;
        tokio::spawn(async move {
            if engine.check_account().await && active {
                engine.run(SyncMode::Full).await;
            }
        });
    }

    async fn enable(&mut self) {
        if self.active {
            log::debug!("Sync scheduler: sync already enabled");
            return;
        }
        if !self.store.sync_enabled() {
            self.store.set_sync_enabled(true).await;
            // Flipping the flag is not an edit worth pushing
            self.writes.borrow_and_update();
        }
        log::info!("Sync scheduler: sync enabled");
        self.activate();
    }

    /// Start polling and run the initial full sync
    fn activate(&mut self) {
        let period = self.timings.poll_interval;
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.poll = Some(interval);
        self.active = true;

        let engine = self.engine.clone();
        tokio::spawn(async move {
            if engine.check_account().await {
                engine.run(SyncMode::Full).await;
            }
        });
    }

    async fn disable(&mut self) {
        self.active = false;
        self.poll = None;
        self.push_deadline = None;
        if self.store.sync_enabled() {
            self.store.set_sync_enabled(false).await;
            self.writes.borrow_and_update();
        }
        self.store.update_sync_status(|status| {
            status.state = SyncState::Idle;
            status.error = None;
        });
        log::info!("Sync scheduler: sync disabled");
    }

    fn spawn_sync(&self, mode: SyncMode) {
        let engine = self.engine.clone();
        tokio::spawn(async move {
            engine.run(mode).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::storage::Document;
    use crate::sync::SyncStatus;
    use crate::testing::{MemoryStore, ScriptedCloud};

    struct Harness {
        store: Arc<Store>,
        cloud: Arc<ScriptedCloud>,
        scheduler: SyncScheduler,
    }

    fn start(sync_enabled: bool) -> Harness {
        let document = Document {
            sync_enabled,
            ..Document::default_document()
        };
        let store = Arc::new(Store::with_document(Arc::new(MemoryStore::default()), document));
        let cloud = Arc::new(ScriptedCloud::default());
        let engine = Arc::new(SyncEngine::new(store.clone(), cloud.clone()));
        let scheduler = start_sync_scheduler(engine, store.clone(), SyncTimings::default());
        Harness { store, cloud, scheduler }
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_saves_coalesce_into_one_push() {
        let h = start(true);
        sleep_ms(10).await;
        assert_eq!(h.cloud.full_count(), 1);

        h.store.save_data().await;
        sleep_ms(100).await;
        h.store.save_data().await;
        sleep_ms(100).await;
        h.store.save_data().await;

        sleep_ms(1_500).await;
        assert_eq!(h.cloud.push_count(), 0);

        sleep_ms(1_000).await;
        assert_eq!(h.cloud.push_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_skipped_right_after_local_write() {
        let h = start(true);

        sleep_ms(29_000).await;
        h.store.save_data().await;
        sleep_ms(2_500).await;
        assert_eq!(h.cloud.pull_count(), 0);
        assert_eq!(h.cloud.push_count(), 1);

        sleep_ms(30_000).await;
        assert_eq!(h.cloud.pull_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enable_runs_full_sync_without_pushing_the_flag() {
        let h = start(false);
        sleep_ms(10).await;
        h.store.save_data().await;
        sleep_ms(5_000).await;
        assert_eq!(h.cloud.push_count(), 0);

        h.scheduler.enable_sync();
        sleep_ms(10).await;
        assert!(h.store.sync_enabled());
        assert_eq!(h.cloud.full_count(), 1);

        h.scheduler.enable_sync();
        sleep_ms(5_000).await;
        assert_eq!(h.cloud.full_count(), 1);
        assert_eq!(h.cloud.push_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disable_stops_polling_and_pending_push() {
        let h = start(true);
        sleep_ms(10).await;

        h.store.save_data().await;
        h.scheduler.disable_sync();
        sleep_ms(100_000).await;

        assert!(!h.store.sync_enabled());
        assert_eq!(h.cloud.push_count(), 0);
        assert_eq!(h.cloud.pull_count(), 0);
        assert_eq!(h.store.sync_status().state, SyncState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_resyncs_only_when_enabled() {
        let h = start(false);
        h.scheduler.window_focused();
        sleep_ms(10).await;
        assert_eq!(h.cloud.full_count(), 0);
        assert!(h.store.sync_status().cloud_available);

        let h = start(true);
        sleep_ms(10).await;
        h.scheduler.window_focused();
        sleep_ms(10).await;
        assert_eq!(h.cloud.full_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_account_never_syncs() {
        let h = start(false);
        h.cloud.set_unavailable();

        h.scheduler.enable_sync();
        sleep_ms(10).await;

        assert_eq!(h.cloud.full_count(), 0);
        let status: SyncStatus = h.store.sync_status();
        assert_eq!(status.state, SyncState::Offline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_waits_for_sync_in_flight() {
        let h = start(true);
        h.cloud.set_delay(Duration::from_secs(5));
        sleep_ms(10).await;
        assert_eq!(h.cloud.full_count(), 1);

        h.store.save_data().await;
        sleep_ms(2_500).await;
        assert_eq!(h.cloud.push_count(), 0);

        sleep_ms(4_000).await;
        assert_eq!(h.cloud.push_count(), 1);
    }
}
