//! Router configuration for the TIFF proxy.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! request tracing and optional static asset serving.
//!
//! # Route Structure
//!
//! ```text
//! /health                        - Health check
//! /convert-tiff?url=<url>        - Convert a remote TIFF to PNG
//! /cache-stats                   - Cache occupancy
//! /*                             - Static assets (when a static dir is set)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tiff_proxy::server::routes::{create_router, RouterConfig};
//! use tiff_proxy::convert::ConvertService;
//! use tiff_proxy::io::HttpImageSource;
//!
//! let service = ConvertService::with_cache_capacity(HttpImageSource::new()?, 10);
//! let router = create_router(service, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::path::PathBuf;
use std::time::Duration;

use axum::{routing::get, Router};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{cache_stats_handler, convert_handler, health_handler, AppState};
use crate::config::DEFAULT_CACHE_MAX_AGE;
use crate::convert::ConvertService;
use crate::io::ImageSource;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds for converted images
    pub cache_max_age: u32,

    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// Directory served for paths that match no API route
    pub static_dir: Option<PathBuf>,
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Cache max-age is 1 hour (3600 seconds)
    /// - Tracing is enabled
    /// - No static assets are served
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            enable_tracing: true,
            static_dir: None,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Serve static assets from `dir` for unmatched paths.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// # Arguments
///
/// * `convert_service` - The conversion service backing `/convert-tiff`
/// * `config` - Router configuration
pub fn create_router<S>(convert_service: ConvertService<S>, config: RouterConfig) -> Router
where
    S: ImageSource + 'static,
{
    let app_state = AppState::with_cache_max_age(convert_service, config.cache_max_age);

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/convert-tiff", get(convert_handler::<S>))
        .route("/cache-stats", get(cache_stats_handler::<S>))
        .with_state(app_state);

    if let Some(ref dir) = config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    let router = router.layer(build_cors_layer(&config));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
