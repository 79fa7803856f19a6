pub mod add;
pub mod boards;
pub mod bookmarks;
pub mod notes;
pub mod stats;
pub mod sync;
pub mod tags;
