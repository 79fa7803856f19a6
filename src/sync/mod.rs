//! Cloud sync: the engine runs single sync attempts, the scheduler decides
//! when to run them.

pub mod config;

mod engine;
mod scheduler;

pub use config::{SyncMode, SyncOutcome, SyncState, SyncStatus, SyncTimings};
pub use engine::SyncEngine;
pub use scheduler::{start_sync_scheduler, SyncScheduler, SyncSchedulerMessage};
