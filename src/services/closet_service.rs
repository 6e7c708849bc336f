//! Service for loading, adding and deleting closet items.
//!
//! Talks to the injected [`ItemStore`] and reports every outcome through the
//! injected [`Notifier`]. Callers apply returned data to `ClosetState` only on
//! success, so a failed operation leaves the galleries untouched.

use crate::error::Result;
use crate::model::ClothingItem;
use crate::services::notification_service::{Notice, Notifier};
use crate::state::NewUpload;
use crate::store::ItemStore;
use log::error;
use std::sync::Arc;

/// Service for item store operations of one user.
#[derive(Clone)]
pub struct ClosetService {
    store: Arc<dyn ItemStore>,
    notifier: Arc<dyn Notifier>,
    user_id: String,
}

impl ClosetService {
    /// Creates a new closet service.
    pub fn new(store: Arc<dyn ItemStore>, notifier: Arc<dyn Notifier>, user_id: String) -> Self {
        Self {
            store,
            notifier,
            user_id,
        }
    }

    /// Loads all items of the user, newest first.
    pub fn load(&self) -> Result<Vec<ClothingItem>> {
        self.store.fetch_items(&self.user_id).inspect_err(|e| {
            error!("Error fetching items: {}", e);
            self.notifier.notify(Notice::load_failed());
        })
    }

    /// Stores a new item and returns its record.
    pub fn add(&self, upload: NewUpload) -> Result<ClothingItem> {
        match self.store.add_item(&self.user_id, upload) {
            Ok(item) => {
                self.notifier.notify(Notice::item_added(item.category));
                Ok(item)
            }
            Err(e) => {
                error!("Error adding item: {}", e);
                self.notifier.notify(Notice::upload_failed());
                Err(e)
            }
        }
    }

    /// Deletes an item and its stored image.
    pub fn delete(&self, id: &str, url: &str) -> Result<()> {
        match self.store.delete_item(id, url) {
            Ok(()) => {
                self.notifier.notify(Notice::item_deleted());
                Ok(())
            }
            Err(e) => {
                error!("Error deleting item: {}", e);
                self.notifier.notify(Notice::delete_failed());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::AppError;
    use chrono::Utc;
    use std::sync::Mutex;

    /// In-memory store with switchable failure.
    #[derive(Default)]
    pub struct MemoryStore {
        pub items: Mutex<Vec<ClothingItem>>,
        pub fail: Mutex<bool>,
    }

    impl MemoryStore {
        pub fn failing() -> Self {
            let store = Self::default();
            *store.fail.lock().unwrap() = true;
            store
        }

        fn check(&self) -> Result<()> {
            if *self.fail.lock().unwrap() {
                Err(AppError::Storage("backend unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl ItemStore for MemoryStore {
        fn fetch_items(&self, _user_id: &str) -> Result<Vec<ClothingItem>> {
            self.check()?;
            Ok(self.items.lock().unwrap().clone())
        }

        fn add_item(&self, user_id: &str, upload: NewUpload) -> Result<ClothingItem> {
            self.check()?;
            let mut items = self.items.lock().unwrap();
            let item = ClothingItem {
                id: format!("item-{}", items.len()),
                url: format!("mem://{}/item-{}.{}", user_id, items.len(), upload.extension),
                category: upload.category,
                created_at: Utc::now(),
                preview: false,
            };
            items.insert(0, item.clone());
            Ok(item)
        }

        fn delete_item(&self, id: &str, _url: &str) -> Result<()> {
            self.check()?;
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|item| item.id != id);
            if items.len() == before {
                return Err(AppError::NotFound(id.to_string()));
            }
            Ok(())
        }
    }

    /// Notifier recording every notice.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub notices: Mutex<Vec<Notice>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{MemoryStore, RecordingNotifier};
    use super::*;
    use crate::model::Category;
    use crate::state::ClosetState;

    fn service(store: Arc<MemoryStore>, notifier: Arc<RecordingNotifier>) -> ClosetService {
        ClosetService::new(store, notifier, "alice".to_string())
    }

    fn upload(category: Category) -> NewUpload {
        NewUpload {
            extension: "png".to_string(),
            bytes: vec![0; 4],
            category,
        }
    }

    #[test]
    fn add_notifies_and_returns_item() {
        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service(store.clone(), notifier.clone());

        let item = service.add(upload(Category::Top)).unwrap();
        assert_eq!(item.category, Category::Top);
        assert_eq!(store.items.lock().unwrap().len(), 1);

        let notices = notifier.notices.lock().unwrap();
        assert_eq!(notices.as_slice(), [Notice::item_added(Category::Top)]);
    }

    #[test]
    fn failed_upload_leaves_closet_unchanged() {
        let store = Arc::new(MemoryStore::failing());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service(store, notifier.clone());
        let mut closet = ClosetState::new();

        if let Ok(item) = service.add(upload(Category::Bottom)) {
            closet.insert_item(item);
        }

        assert_eq!(closet.counts(), (0, 0));
        assert_eq!(
            notifier.notices.lock().unwrap().as_slice(),
            [Notice::upload_failed()]
        );
    }

    #[test]
    fn delete_round_trip() {
        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service(store.clone(), notifier.clone());

        let item = service.add(upload(Category::Top)).unwrap();
        service.delete(&item.id, &item.url).unwrap();
        assert!(service.load().unwrap().is_empty());

        assert!(service.delete(&item.id, &item.url).is_err());
        let notices = notifier.notices.lock().unwrap();
        assert_eq!(notices.last(), Some(&Notice::delete_failed()));
    }

    #[test]
    fn load_failure_notifies() {
        let store = Arc::new(MemoryStore::failing());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service(store, notifier.clone());

        assert!(service.load().is_err());
        assert_eq!(
            notifier.notices.lock().unwrap().as_slice(),
            [Notice::load_failed()]
        );
    }
}
