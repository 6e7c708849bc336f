//! Application configuration.
//!
//! Compile-time constants for gallery behavior and upload limits, plus the
//! runtime store location resolved from the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Supported image file extensions for uploads.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Horizontal drag distance (px) a gesture must exceed to change page.
pub const SWIPE_THRESHOLD_PX: f32 = 100.0;

/// Container width used before the UI has reported a real one.
pub const DEFAULT_CONTAINER_WIDTH_PX: f32 = 300.0;

/// Duration of the settle animation after a gesture is released.
pub const SETTLE_ANIMATION: Duration = Duration::from_millis(300);

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Number of decoded images kept in memory.
pub const IMAGE_CACHE_CAPACITY: usize = 64;

/// File name of the record index inside the store root.
pub const STORE_INDEX_FILE: &str = "items.json";

/// Directory holding stored image objects inside the store root.
pub const STORE_OBJECTS_DIR: &str = "objects";

const DATA_DIR_ENV: &str = "CLOSET_DATA_DIR";
const USER_ENV: &str = "CLOSET_USER";
const DEFAULT_DATA_DIR: &str = "closet-data";
const DEFAULT_USER: &str = "local";

/// Where the item store lives and whose items it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub user_id: String,
}

impl StoreConfig {
    /// Resolves the store configuration from `CLOSET_DATA_DIR` and `CLOSET_USER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let user_id = lookup(USER_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string());

        Self { data_dir, user_id }
    }
}
