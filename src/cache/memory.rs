use std::sync::{Arc, Mutex};

use image::DynamicImage;
use lru::LruCache;

/// Byte-cost-bounded in-memory image cache with strict LRU eviction.
///
/// The `lru` crate tracks recency; the byte budget is accounted here, so the
/// cache is bounded by cumulative estimated cost rather than entry count.
pub struct MemoryCache {
    limit: usize,
    inner: Mutex<Inner>,
}

struct Inner {
    entries: LruCache<String, CachedImage>,
    total_cost: usize,
}

struct CachedImage {
    image: Arc<DynamicImage>,
    cost: usize,
}

/// Decoded size estimate: RGBA8 footprint of the pixel buffer.
fn image_cost(image: &DynamicImage) -> usize {
    (image.width() as usize) * (image.height() as usize) * 4
}

impl MemoryCache {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            inner: Mutex::new(Inner {
                entries: LruCache::unbounded(),
                total_cost: 0,
            }),
        }
    }

    /// Look up `key`, marking it most-recently-used on a hit.
    pub fn get(&self, key: &str) -> Option<Arc<DynamicImage>> {
        let mut inner = self.inner.lock().expect("memory cache poisoned");
        inner.entries.get(key).map(|e| e.image.clone())
    }

    /// Insert `image` under `key`, evicting least-recently-used entries until
    /// the cumulative cost fits the limit. An image larger than the whole
    /// budget is not cached at all.
    pub fn insert(&self, image: Arc<DynamicImage>, key: &str) {
        let cost = image_cost(&image);
        if cost > self.limit {
            tracing::debug!("Image for {} exceeds memory budget ({} bytes), skipping", key, cost);
            return;
        }

        let mut inner = self.inner.lock().expect("memory cache poisoned");
        if let Some(old) = inner.entries.put(key.to_owned(), CachedImage { image, cost }) {
            inner.total_cost -= old.cost;
        }
        inner.total_cost += cost;

        while inner.total_cost > self.limit {
            match inner.entries.pop_lru() {
                Some((_, evicted)) => inner.total_cost -= evicted.cost,
                None => break,
            }
        }
    }

    #[cfg(test)]
    fn total_cost(&self) -> usize {
        self.inner.lock().unwrap().total_cost
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 10x10 RGBA8 = 400 bytes of estimated cost per image.
    fn small_image() -> Arc<DynamicImage> {
        Arc::new(DynamicImage::new_rgba8(10, 10))
    }

    #[test]
    fn test_get_returns_inserted_image() {
        let cache = MemoryCache::new(10_000);
        let img = small_image();
        cache.insert(img.clone(), "k");
        assert!(cache.get("k").is_some());
        assert_eq!(cache.total_cost(), 400);
    }

    #[test]
    fn test_miss_returns_none() {
        let cache = MemoryCache::new(10_000);
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_reinsert_same_key_does_not_double_count() {
        let cache = MemoryCache::new(10_000);
        cache.insert(small_image(), "k");
        cache.insert(small_image(), "k");
        assert_eq!(cache.total_cost(), 400);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used_first() {
        // Budget fits exactly two 400-byte images.
        let cache = MemoryCache::new(800);
        cache.insert(small_image(), "a");
        cache.insert(small_image(), "b");

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get("a").is_some());
        cache.insert(small_image(), "c");

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.total_cost(), 800);
    }

    #[test]
    fn test_oversized_image_not_cached() {
        let cache = MemoryCache::new(100);
        cache.insert(small_image(), "big");
        assert!(cache.get("big").is_none());
        assert_eq!(cache.total_cost(), 0);
    }
}
