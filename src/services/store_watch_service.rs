//! Service for refreshing the closet when the store changes on disk.
//!
//! Watches the store's record index and reloads the item list whenever it is
//! rewritten, e.g. by another instance sharing the same data directory.

use crate::error::{AppError, Result};
use crate::file_utils::PathExt;
use crate::model::ClothingItem;
use crate::services::ClosetService;
use log::{debug, warn};
use notify_debouncer_mini::notify::{PollWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer_opt, Config, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Live watcher; dropping it stops the watch.
pub type StoreDebouncer = Debouncer<PollWatcher>;

/// Returns true when any changed path is the index file.
fn touches_index<'a>(changed: impl IntoIterator<Item = &'a Path>, index_path: &Path) -> bool {
    let index_name = index_path.file_name();
    changed
        .into_iter()
        .any(|path| path == index_path || path.file_name() == index_name)
}

/// Handles debounced file system events.
fn handle_debounced_events<F>(
    events: Vec<DebouncedEvent>,
    index_path: &Path,
    closet_service: &ClosetService,
    on_change: &Arc<F>,
) where
    F: Fn(Vec<ClothingItem>) + Send + Sync + 'static,
{
    if !touches_index(events.iter().map(|event| event.path.as_path()), index_path) {
        return;
    }

    debug!(
        "Store index changed: {} ({} events)",
        index_path.format_for_log(),
        events.len()
    );

    let items = match closet_service.load() {
        Ok(items) => items,
        Err(e) => {
            warn!("Failed to reload items: {}", e);
            return;
        }
    };

    let on_change = on_change.clone();
    let _ = slint::invoke_from_event_loop(move || {
        on_change(items);
    });
}

/// Service for managing store refreshes.
pub struct StoreWatchService {
    closet_service: ClosetService,
    index_path: PathBuf,
}

impl StoreWatchService {
    pub fn new(closet_service: ClosetService, index_path: PathBuf) -> Self {
        Self {
            closet_service,
            index_path,
        }
    }

    /// Starts watching the index with a debounced poll watcher.
    ///
    /// `on_change` runs on the UI thread with the reloaded items.
    pub fn start_watching<F>(&self, on_change: F) -> Result<StoreDebouncer>
    where
        F: Fn(Vec<ClothingItem>) + Send + Sync + 'static,
    {
        let directory = self
            .index_path
            .parent()
            .ok_or_else(|| AppError::Storage("Store index has no parent directory".to_string()))?
            .to_path_buf();

        let closet_service = self.closet_service.clone();
        let index_path = self.index_path.clone();
        let on_change = Arc::new(on_change);

        let notify_config = notify_debouncer_mini::notify::Config::default()
            .with_poll_interval(Duration::from_secs(2));
        let debouncer_config = Config::default()
            .with_timeout(Duration::from_millis(500))
            .with_notify_config(notify_config);

        let mut debouncer = new_debouncer_opt::<_, PollWatcher>(
            debouncer_config,
            move |res: notify_debouncer_mini::DebounceEventResult| match res {
                Ok(events) => {
                    handle_debounced_events(events, &index_path, &closet_service, &on_change);
                }
                Err(error) => warn!("Store watcher error: {}", error),
            },
        )
        .map_err(|e| AppError::Storage(format!("Failed to create debouncer: {}", e)))?;

        debouncer
            .watcher()
            .watch(&directory, RecursiveMode::NonRecursive)
            .map_err(|e| AppError::Storage(format!("Failed to watch store: {}", e)))?;

        debug!("Watching store index {}", self.index_path.display());
        Ok(debouncer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_index_changes_trigger_reload() {
        let index = Path::new("/data/items.json");
        assert!(touches_index([Path::new("/data/items.json")], index));
        assert!(!touches_index([Path::new("/data/items.json.tmp")], index));
        assert!(!touches_index([Path::new("/data/objects")], index));
        assert!(!touches_index(std::iter::empty::<&Path>(), index));
    }
}
