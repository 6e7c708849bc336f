//! Persistence boundary for clothing items and their image bytes.
//!
//! The UI and services only see [`ItemStore`]; the concrete backend is chosen
//! once at startup and passed in explicitly.

use crate::error::Result;
use crate::model::ClothingItem;
use crate::state::NewUpload;

pub mod local;

pub use local::LocalItemStore;

/// Per-user record and object storage.
///
/// Calls block on I/O and are made from worker threads.
pub trait ItemStore: Send + Sync {
    /// All items of `user_id`, newest first.
    fn fetch_items(&self, user_id: &str) -> Result<Vec<ClothingItem>>;

    /// Stores the image bytes, then inserts the record pointing at them.
    fn add_item(&self, user_id: &str, upload: NewUpload) -> Result<ClothingItem>;

    /// Removes the stored object behind `url`, then the record `id`.
    fn delete_item(&self, id: &str, url: &str) -> Result<()>;
}
