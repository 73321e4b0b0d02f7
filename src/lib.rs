//! # TIFF Proxy
//!
//! An on-demand image conversion proxy: given the URL of a remote TIFF image,
//! it fetches the image, re-encodes it as PNG and serves the result.
//! Recently converted images are kept in a bounded in-memory cache so repeat
//! requests skip the upstream fetch entirely.
//!
//! ## Features
//!
//! - **Bounded LRU cache**: entry-count capacity with strict recency ordering
//! - **Single-flight conversion**: concurrent requests for the same URL share
//!   one upstream fetch and receive the same outcome
//! - **Bounded fetches**: every upstream request carries a timeout
//! - **Lossless output**: PNG encoded with the fastest compression setting
//!
//! ## Architecture
//!
//! - [`io`] - Upstream image sources (reqwest-backed HTTP source)
//! - [`convert`] - Cache keys, LRU cache, TIFF→PNG encoder, resolver
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use tiff_proxy::{create_router, ConvertService, HttpImageSource, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpImageSource::new()?;
//!     let service = ConvertService::with_cache_capacity(source, 10);
//!     let router = create_router(service, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod io;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use convert::{
    derive_key, is_png, parse_source_url, CacheKey, CacheStats, ConvertResponse, ConvertService,
    ImageCache, TiffPngEncoder, Transcoder, DEFAULT_CACHE_CAPACITY,
};
pub use error::ConvertError;
pub use io::{HttpImageSource, ImageSource, DEFAULT_FETCH_TIMEOUT};
pub use server::{
    cache_stats_handler, convert_handler, create_router, health_handler, AppState,
    CacheStatsResponse, ErrorResponse, HealthResponse, RouterConfig,
};
