//! Filesystem-backed item store.
//!
//! Layout below the root directory:
//! - `items.json`: JSON array of records
//! - `objects/<user>/<uuid>.<ext>`: stored images

use crate::config::{STORE_INDEX_FILE, STORE_OBJECTS_DIR};
use crate::error::{AppError, Result};
use crate::file_utils::{self, PathExt};
use crate::model::ClothingItem;
use crate::state::NewUpload;
use crate::store::ItemStore;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// Index row: an item scoped to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    user_id: String,
    #[serde(flatten)]
    item: ClothingItem,
}

/// Item store keeping records in a JSON index and images as plain files.
pub struct LocalItemStore {
    root: PathBuf,
    /// Serializes read-modify-write cycles on the index.
    index_lock: Mutex<()>,
}

fn validate_user_id(user_id: &str) -> Result<()> {
    let valid = !user_id.is_empty()
        && user_id != "."
        && user_id != ".."
        && !user_id.contains(['/', '\\']);
    if valid {
        Ok(())
    } else {
        Err(AppError::Storage(format!("Invalid user id: {:?}", user_id)))
    }
}

impl LocalItemStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root.join(STORE_OBJECTS_DIR))?;
        let root = root.canonicalize()?;
        info!("Opened item store at {}", root.display());

        Ok(Self {
            root,
            index_lock: Mutex::new(()),
        })
    }

    /// Path of the record index, watched for external changes.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(STORE_INDEX_FILE)
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(STORE_OBJECTS_DIR).join(key)
    }

    fn read_index(&self) -> Result<Vec<StoredRecord>> {
        match fs::read(self.index_path()) {
            Ok(bytes) if bytes.iter().all(|b| b.is_ascii_whitespace()) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_index(&self, records: &[StoredRecord]) -> Result<()> {
        let index_path = self.index_path();
        let tmp_path = index_path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec_pretty(records)?)?;
        fs::rename(&tmp_path, &index_path)?;
        Ok(())
    }

    fn lock_index(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.index_lock
            .lock()
            .map_err(|_| AppError::Storage("Index lock poisoned".to_string()))
    }
}

impl ItemStore for LocalItemStore {
    fn fetch_items(&self, user_id: &str) -> Result<Vec<ClothingItem>> {
        validate_user_id(user_id)?;
        let _guard = self.lock_index()?;

        let mut items: Vec<ClothingItem> = self
            .read_index()?
            .into_iter()
            .filter(|record| record.user_id == user_id)
            .map(|record| record.item)
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!("Fetched {} items for {}", items.len(), user_id);
        Ok(items)
    }

    fn add_item(&self, user_id: &str, upload: NewUpload) -> Result<ClothingItem> {
        validate_user_id(user_id)?;
        let _guard = self.lock_index()?;

        let key = format!("{}/{}.{}", user_id, Uuid::new_v4(), upload.extension);
        let object_path = self.object_path(&key);
        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&object_path, &upload.bytes)?;

        let item = ClothingItem {
            id: Uuid::new_v4().to_string(),
            url: file_utils::path_to_url(&object_path),
            category: upload.category,
            created_at: Utc::now(),
            preview: false,
        };

        let result = self.read_index().and_then(|mut records| {
            records.push(StoredRecord {
                user_id: user_id.to_string(),
                item: item.clone(),
            });
            self.write_index(&records)
        });

        if let Err(e) = result {
            // Do not leave an orphaned object behind a failed insert.
            if let Err(cleanup) = fs::remove_file(&object_path) {
                warn!("Failed to remove orphaned object {}: {}", key, cleanup);
            }
            return Err(e);
        }

        info!(
            "Stored {} in {} ({} bytes)",
            object_path.format_for_log(),
            item.category,
            upload.bytes.len()
        );
        Ok(item)
    }

    fn delete_item(&self, id: &str, url: &str) -> Result<()> {
        let key = file_utils::object_key_from_url(url)
            .ok_or_else(|| AppError::Storage(format!("Unrecognized image reference: {}", url)))?;
        let _guard = self.lock_index()?;

        let mut records = self.read_index()?;
        let position = records
            .iter()
            .position(|record| record.item.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        let record = &records[position];
        if file_utils::object_key_from_url(&record.item.url).as_deref() != Some(key.as_str())
            || !key.starts_with(&format!("{}/", record.user_id))
        {
            return Err(AppError::Storage(format!(
                "Image reference {} does not belong to item {}",
                url, id
            )));
        }

        match fs::remove_file(self.object_path(&key)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Stored object {} already missing", key);
            }
            Err(e) => return Err(e.into()),
        }

        records.remove(position);
        self.write_index(&records)?;

        info!("Deleted item {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use tempfile::TempDir;

    fn upload(category: Category) -> NewUpload {
        NewUpload {
            extension: "png".to_string(),
            bytes: vec![1, 2, 3],
            category,
        }
    }

    #[test]
    fn empty_store_has_no_items() {
        let dir = TempDir::new().unwrap();
        let store = LocalItemStore::open(dir.path()).unwrap();
        assert!(store.fetch_items("alice").unwrap().is_empty());
    }

    #[test]
    fn add_then_fetch_scoped_by_user() {
        let dir = TempDir::new().unwrap();
        let store = LocalItemStore::open(dir.path()).unwrap();

        let first = store.add_item("alice", upload(Category::Top)).unwrap();
        let second = store.add_item("alice", upload(Category::Bottom)).unwrap();
        store.add_item("bob", upload(Category::Top)).unwrap();

        let items = store.fetch_items("alice").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, second.id);
        assert_eq!(items[1].id, first.id);

        let object = file_utils::url_to_path(&first.url).unwrap();
        assert_eq!(fs::read(object).unwrap(), vec![1, 2, 3]);
        assert!(first.url.contains("/alice/"));
    }

    #[test]
    fn records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let added = {
            let store = LocalItemStore::open(dir.path()).unwrap();
            store.add_item("alice", upload(Category::Top)).unwrap()
        };

        let store = LocalItemStore::open(dir.path()).unwrap();
        let items = store.fetch_items("alice").unwrap();
        assert_eq!(items, vec![added]);
    }

    #[test]
    fn delete_removes_object_and_record() {
        let dir = TempDir::new().unwrap();
        let store = LocalItemStore::open(dir.path()).unwrap();
        let item = store.add_item("alice", upload(Category::Top)).unwrap();
        let object = file_utils::url_to_path(&item.url).unwrap();

        store.delete_item(&item.id, &item.url).unwrap();

        assert!(!object.exists());
        assert!(store.fetch_items("alice").unwrap().is_empty());
    }

    #[test]
    fn deleting_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = LocalItemStore::open(dir.path()).unwrap();
        let result = store.delete_item("missing", "file:///x/alice/a.png");
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn delete_refuses_reference_of_another_item() {
        let dir = TempDir::new().unwrap();
        let store = LocalItemStore::open(dir.path()).unwrap();
        let kept = store.add_item("alice", upload(Category::Top)).unwrap();
        let target = store.add_item("alice", upload(Category::Bottom)).unwrap();

        let result = store.delete_item(&target.id, &kept.url);
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(file_utils::url_to_path(&kept.url).unwrap().exists());
        assert_eq!(store.fetch_items("alice").unwrap().len(), 2);

        let escape = format!("file://{}/objects/../items.json", dir.path().display());
        assert!(store.delete_item(&target.id, &escape).is_err());
        assert!(store.index_path().exists());
    }

    #[test]
    fn rejects_path_like_user_ids() {
        let dir = TempDir::new().unwrap();
        let store = LocalItemStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.add_item("../escape", upload(Category::Top)),
            Err(AppError::Storage(_))
        ));
        assert!(store.fetch_items("").is_err());
    }

    #[test]
    fn corrupt_index_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = LocalItemStore::open(dir.path()).unwrap();
        fs::write(store.index_path(), b"{not json").unwrap();
        assert!(matches!(
            store.fetch_items("alice"),
            Err(AppError::Serialization(_))
        ));
    }
}
