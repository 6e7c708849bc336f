//! State management for the closet application.

use crate::config::IMAGE_CACHE_CAPACITY;
use crate::image_cache::ImageCache;
use crate::services::{ClosetService, Notifier, StoreDebouncer};
use crate::store::ItemStore;
use std::sync::{Arc, Mutex};

pub mod closet;
pub mod gallery;
pub mod upload;

pub use closet::ClosetState;
pub use gallery::{Direction, Gallery, GalleryEvent, GalleryView};
pub use upload::{NewUpload, UploadDraft};

/// Application-wide state container.
pub struct AppState {
    pub closet: Arc<Mutex<ClosetState>>,
    /// The "add to closet" dialog draft.
    pub draft: Arc<Mutex<UploadDraft>>,
    /// LRU cache for decoded images.
    pub image_cache: Arc<Mutex<ImageCache>>,
    pub closet_service: ClosetService,
    pub notifier: Arc<dyn Notifier>,
    /// Keeps the store watcher alive.
    pub store_watcher: Arc<Mutex<Option<StoreDebouncer>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>, notifier: Arc<dyn Notifier>, user_id: String) -> Self {
        Self {
            closet: Arc::new(Mutex::new(ClosetState::new())),
            draft: Arc::new(Mutex::new(UploadDraft::new())),
            image_cache: Arc::new(Mutex::new(ImageCache::new(IMAGE_CACHE_CAPACITY))),
            closet_service: ClosetService::new(store, notifier.clone(), user_id),
            notifier,
            store_watcher: Arc::new(Mutex::new(None)),
        }
    }
}
