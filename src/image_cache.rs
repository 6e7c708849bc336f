//! Image cache for gallery refreshes.
//!
//! Caches decoded RGB8 image data keyed by image reference using an LRU
//! policy, so re-rendering a gallery after a list change does not decode
//! unchanged images again.

use lru::LruCache;
use std::num::NonZeroUsize;

/// Cached RGB8 pixel data.
#[derive(Clone)]
pub struct CachedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CachedImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }
}

/// LRU cache for storing decoded images.
pub struct ImageCache {
    cache: LruCache<String, CachedImage>,
}

impl ImageCache {
    /// Creates a new image cache; a zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Retrieves an image from the cache if it exists.
    pub fn get(&mut self, url: &str) -> Option<CachedImage> {
        let result = self.cache.get(url).cloned();
        if result.is_some() {
            log::debug!("Cache HIT: {}", url);
        } else {
            log::debug!("Cache MISS: {}", url);
        }
        result
    }

    /// Stores an image in the cache.
    pub fn put(&mut self, url: String, cached_image: CachedImage) {
        log::debug!(
            "Cache PUT: {} ({}x{})",
            url,
            cached_image.width,
            cached_image.height
        );
        self.cache.put(url, cached_image);
    }

    /// Grows the cache so `len` images fit at once. Never shrinks.
    pub fn reserve(&mut self, len: usize) {
        let Some(capacity) = NonZeroUsize::new(len) else {
            return;
        };
        if capacity > self.cache.cap() {
            log::debug!("Cache resize: {} -> {}", self.cache.cap(), capacity);
            self.cache.resize(capacity);
        }
    }

    /// Drops an image, e.g. after its item was deleted.
    pub fn remove(&mut self, url: &str) {
        self.cache.pop(url);
    }

    /// Checks if an image is in the cache without touching its recency.
    pub fn contains(&self, url: &str) -> bool {
        self.cache.contains(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel() -> CachedImage {
        CachedImage::new(vec![0, 0, 0], 1, 1)
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = ImageCache::new(2);
        cache.put("a".to_string(), pixel());
        cache.put("b".to_string(), pixel());
        assert!(cache.get("a").is_some());

        cache.put("c".to_string(), pixel());
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn reserved_cache_keeps_every_image() {
        let mut cache = ImageCache::new(64);
        cache.reserve(74);
        let urls: Vec<String> = (0..74).map(|i| format!("file:///objects/u/{i}.png")).collect();
        for url in &urls {
            cache.put(url.clone(), pixel());
        }
        assert!(urls.iter().all(|url| cache.contains(url)));

        cache.reserve(10);
        assert!(urls.iter().all(|url| cache.contains(url)));
    }

    #[test]
    fn remove_and_zero_capacity() {
        let mut cache = ImageCache::new(0);
        cache.put("a".to_string(), pixel());
        cache.remove("a");
        assert!(cache.get("a").is_none());
    }
}
