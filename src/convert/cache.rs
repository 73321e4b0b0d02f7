//! Bounded cache for converted PNG images.
//!
//! This module provides an entry-count bounded LRU cache keyed by
//! [`CacheKey`], so repeated requests for the same URL skip the upstream
//! fetch and the decode/encode cycle.
//!
//! # Eviction
//!
//! Recency is strict: every `get`, `touch` and `put` moves the entry to the
//! most-recently-used position. When an insert would exceed capacity, the
//! least-recently-used entry is evicted before the new entry is admitted.
//! There is no byte-size accounting and no expiry.

use std::num::NonZeroUsize;

use bytes::Bytes;
use lru::LruCache;
use tokio::sync::RwLock;

use super::key::CacheKey;

/// Default number of converted images kept resident.
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

// =============================================================================
// Cache Stats
// =============================================================================

/// Point-in-time snapshot of cache occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of resident entries
    pub count: usize,

    /// Maximum number of resident entries
    pub capacity: usize,

    /// Resident keys, most-recently-used first
    pub keys: Vec<CacheKey>,
}

// =============================================================================
// Image Cache
// =============================================================================

/// LRU cache of PNG payloads with a fixed entry capacity.
///
/// # Thread Safety
///
/// All state lives behind a single lock, so the size bound and the recency
/// order are never observed half-updated. The lock is only held for
/// bookkeeping, never across I/O.
///
/// # Example
///
/// ```
/// use tiff_proxy::convert::{derive_key, ImageCache};
/// use bytes::Bytes;
///
/// #[tokio::main]
/// async fn main() {
///     let cache = ImageCache::with_capacity(2);
///
///     let key = derive_key("https://example.com/moon.tif");
///     let png = Bytes::from_static(b"\x89PNG\r\n\x1a\n");
///
///     cache.put(key, png.clone()).await;
///     assert_eq!(cache.get(&key).await, Some(png));
/// }
/// ```
pub struct ImageCache {
    cache: RwLock<LruCache<CacheKey, Bytes>>,
    capacity: NonZeroUsize,
}

impl ImageCache {
    /// Create a cache holding [`DEFAULT_CACHE_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(capacity)),
            capacity,
        }
    }

    /// Get a cached payload, marking it most-recently-used.
    pub async fn get(&self, key: &CacheKey) -> Option<Bytes> {
        let mut cache = self.cache.write().await;
        cache.get(key).cloned()
    }

    /// Refresh an entry's recency without copying its payload.
    ///
    /// Returns `false` if the key is not resident.
    pub async fn touch(&self, key: &CacheKey) -> bool {
        let mut cache = self.cache.write().await;
        cache.get(key).is_some()
    }

    /// Check membership without updating LRU order.
    pub async fn contains(&self, key: &CacheKey) -> bool {
        let cache = self.cache.read().await;
        cache.contains(key)
    }

    /// Store a payload, marking it most-recently-used.
    ///
    /// Overwriting a resident key keeps the entry count unchanged. Inserting
    /// into a full cache evicts the least-recently-used entry, whose key is
    /// returned.
    pub async fn put(&self, key: CacheKey, data: Bytes) -> Option<CacheKey> {
        let mut cache = self.cache.write().await;

        // push hands back either the replaced pair (same key) or the evicted one
        match cache.push(key, data) {
            Some((old_key, _)) if old_key != key => Some(old_key),
            _ => None,
        }
    }

    /// Snapshot occupancy and resident keys, most-recently-used first.
    pub async fn stats(&self) -> CacheStats {
        let cache = self.cache.read().await;
        CacheStats {
            count: cache.len(),
            capacity: self.capacity.get(),
            keys: cache.iter().map(|(key, _)| *key).collect(),
        }
    }

    /// Get the current number of cached images.
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        let cache = self.cache.read().await;
        cache.is_empty()
    }

    /// Get the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
