//! Fetch, convert, and cache pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             ConvertService              │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  ImageCache  │  │   Transcoder    │  │
//! │  │  (LRU of     │  │  (fetch → TIFF  │  │
//! │  │   PNGs)      │  │   → PNG)        │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │               ImageSource               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`CacheKey`]: SHA-256 of the source URL text
//! - [`ImageCache`]: entry-count bounded LRU of PNG payloads
//! - [`TiffPngEncoder`]: decodes TIFF bytes and re-encodes them as PNG
//! - [`Transcoder`]: URL validation, one upstream fetch, then conversion
//! - [`ConvertService`]: cache lookup with single-flight conversion on a miss
//!
//! # Example
//!
//! ```
//! use tiff_proxy::convert::{derive_key, ImageCache};
//! use bytes::Bytes;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = ImageCache::with_capacity(10);
//!     let key = derive_key("https://example.com/moon.tif");
//!
//!     if let Some(png) = cache.get(&key).await {
//!         println!("Cache hit: {} bytes", png.len());
//!     } else {
//!         cache.put(key, Bytes::from_static(b"...")).await;
//!     }
//! }
//! ```

mod cache;
mod encoder;
mod key;
mod service;
mod transcoder;

pub use cache::{CacheStats, ImageCache, DEFAULT_CACHE_CAPACITY};
pub use encoder::{is_png, TiffPngEncoder, PNG_SIGNATURE};
pub use key::{derive_key, CacheKey, CACHE_KEY_LEN};
pub use service::{ConvertResponse, ConvertService};
pub use transcoder::{parse_source_url, Transcoder};
