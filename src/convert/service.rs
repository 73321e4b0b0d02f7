//! Conversion service: the cache-fronted, single-flight resolver.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       ConvertService                         │
//! │  resolve(url)                                                │
//! │    1. key = derive(url)                                      │
//! │    2. cache hit  ──────────────────────────────► bytes       │
//! │    3. in-flight? ── yes ── wait on shared fetch ─► outcome   │
//! │                  └─ no ─── spawn fetch task ─────► outcome   │
//! │                            (put on success, then unregister) │
//! │         │                   │                     │          │
//! │         ▼                   ▼                     ▼          │
//! │   ┌───────────┐    ┌─────────────────┐    ┌──────────────┐   │
//! │   │ImageCache │    │ in-flight map   │    │  Transcoder  │   │
//! │   └───────────┘    └─────────────────┘    └──────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The fetch for a key runs in its own task, detached from the request that
//! started it. Dropping a caller's future only stops that caller's wait; the
//! other waiters and the cache still receive the outcome.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::error::ConvertError;
use crate::io::ImageSource;

use super::cache::{CacheStats, ImageCache};
use super::key::{derive_key, CacheKey};
use super::transcoder::Transcoder;

type Outcome = Result<Bytes, ConvertError>;

/// Shared handle on an in-flight conversion. Holds `None` until it completes.
type PendingFetch = watch::Receiver<Option<Outcome>>;

// =============================================================================
// Convert Response
// =============================================================================

/// Response from the conversion service.
#[derive(Debug, Clone)]
pub struct ConvertResponse {
    /// PNG-encoded image
    pub data: Bytes,

    /// Whether the bytes came straight from the cache
    pub cache_hit: bool,
}

enum Lookup {
    Cached(Bytes),
    Pending(PendingFetch),
}

// =============================================================================
// Convert Service
// =============================================================================

/// Resolves source URLs to PNG bytes through the cache.
///
/// # Concurrency
///
/// At most one conversion per cache key is in flight at any time. Concurrent
/// callers for the same key wait on that conversion and receive the same
/// bytes or the same error. Failures are never cached, so the next request
/// after a failure starts a fresh fetch.
///
/// # Example
///
/// ```ignore
/// use tiff_proxy::convert::ConvertService;
/// use tiff_proxy::io::HttpImageSource;
///
/// let service = ConvertService::with_cache_capacity(HttpImageSource::new()?, 10);
///
/// let response = service.resolve("https://example.com/moon.tif").await?;
/// println!("{} bytes, cache hit: {}", response.data.len(), response.cache_hit);
/// ```
pub struct ConvertService<S: ImageSource> {
    transcoder: Arc<Transcoder<S>>,

    cache: Arc<ImageCache>,

    /// Conversions currently running, by key. Lock order: `in_flight`, then `cache`.
    in_flight: Arc<Mutex<HashMap<CacheKey, PendingFetch>>>,
}

impl<S: ImageSource + 'static> ConvertService<S> {
    /// Create a service with a default-sized cache.
    pub fn new(source: S) -> Self {
        Self::with_cache(source, Arc::new(ImageCache::new()))
    }

    /// Create a service whose cache holds at most `capacity` images.
    pub fn with_cache_capacity(source: S, capacity: usize) -> Self {
        Self::with_cache(source, Arc::new(ImageCache::with_capacity(capacity)))
    }

    /// Create a service around an existing cache.
    pub fn with_cache(source: S, cache: Arc<ImageCache>) -> Self {
        Self {
            transcoder: Arc::new(Transcoder::new(source)),
            cache,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Resolve `url` to PNG bytes, converting on a cache miss.
    ///
    /// # Errors
    ///
    /// Any [`ConvertError`] produced by the conversion. All callers sharing
    /// one conversion receive an identical error.
    pub async fn resolve(&self, url: &str) -> Result<ConvertResponse, ConvertError> {
        let key = derive_key(url);

        if let Some(data) = self.cache.get(&key).await {
            debug!(key = %key, "Cache hit");
            return Ok(ConvertResponse {
                data,
                cache_hit: true,
            });
        }

        let pending = match self.join_or_start(key, url).await {
            Lookup::Cached(data) => {
                return Ok(ConvertResponse {
                    data,
                    cache_hit: true,
                })
            }
            Lookup::Pending(pending) => pending,
        };

        let data = wait_for_outcome(pending).await?;
        Ok(ConvertResponse {
            data,
            cache_hit: false,
        })
    }

    /// Join the conversion running for `key`, or register and spawn one.
    async fn join_or_start(&self, key: CacheKey, url: &str) -> Lookup {
        let mut in_flight = self.in_flight.lock().await;

        if let Some(pending) = in_flight.get(&key) {
            debug!(key = %key, "Joining in-flight conversion");
            return Lookup::Pending(pending.clone());
        }

        // A conversion may have finished between the fast path and taking the lock
        if let Some(data) = self.cache.get(&key).await {
            debug!(key = %key, "Cache hit after in-flight check");
            return Lookup::Cached(data);
        }

        debug!(key = %key, url = %url, "Cache miss, starting conversion");
        let (tx, rx) = watch::channel(None);
        in_flight.insert(key, rx.clone());
        drop(in_flight);

        self.spawn_conversion(key, url.to_string(), tx);
        Lookup::Pending(rx)
    }

    fn spawn_conversion(&self, key: CacheKey, url: String, tx: watch::Sender<Option<Outcome>>) {
        let transcoder = Arc::clone(&self.transcoder);
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);

        tokio::spawn(async move {
            // Inner task so a panic during conversion comes back as a JoinError
            let work = tokio::spawn(async move { transcoder.convert(&url).await });
            let outcome = match work.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ConvertError::internal(format!(
                    "conversion task failed: {}",
                    e
                ))),
            };

            match &outcome {
                Ok(data) => {
                    if let Some(evicted) = cache.put(key, data.clone()).await {
                        debug!(key = %key, evicted = %evicted, "Evicted least-recently-used image");
                    }
                }
                Err(err) => {
                    warn!(key = %key, error_type = err.code(), "Conversion failed: {}", err);
                }
            }

            // Cached before unregistering, so late arrivals see one or the other
            in_flight.lock().await.remove(&key);
            tx.send_replace(Some(outcome));
        });
    }

    /// Snapshot of cache occupancy.
    pub async fn stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Number of conversions currently in flight.
    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    /// Get the shared cache.
    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }

    /// Get the transcoder.
    pub fn transcoder(&self) -> &Transcoder<S> {
        &self.transcoder
    }
}

async fn wait_for_outcome(mut pending: PendingFetch) -> Outcome {
    let outcome = match pending.wait_for(Option::is_some).await {
        Ok(value) => (*value).clone(),
        Err(_) => None,
    };

    outcome.unwrap_or_else(|| {
        Err(ConvertError::internal(
            "conversion ended without reporting a result",
        ))
    })
}

// =============================================================================
// Tests
// =============================================================================
