//! LRU cache for rendered pages of the open document

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use super::types::{Bitmap, Viewport};

/// Default number of rendered pages kept around
pub const DEFAULT_PAGE_CACHE_SIZE: usize = 8;

/// Cache key for rendered pages
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Page number (1-based)
    pub page: usize,
    /// Device scale (stored as millionths for stable hashing)
    pub scale_millionths: u32,
}

impl CacheKey {
    #[must_use]
    pub fn new(page: usize, viewport: &Viewport) -> Self {
        Self {
            page,
            scale_millionths: (viewport.scale * 1_000_000.0) as u32,
        }
    }
}

pub struct PageCache {
    cache: LruCache<CacheKey, Arc<Bitmap>>,
}

impl PageCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Get a cached page, promoting it in the LRU order
    #[must_use]
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<Bitmap>> {
        self.cache.get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.cache.contains(key)
    }

    pub fn insert(&mut self, key: CacheKey, bitmap: Bitmap) -> Arc<Bitmap> {
        let arc = Arc::new(bitmap);
        self.cache.put(key, Arc::clone(&arc));
        arc
    }

    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
