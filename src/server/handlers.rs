//! HTTP request handlers for the conversion API.
//!
//! # Endpoints
//!
//! - `GET /convert-tiff?url=<absolute-url>` - Convert a remote TIFF to PNG
//! - `GET /cache-stats` - Cache occupancy and resident keys
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::config::DEFAULT_CACHE_MAX_AGE;
use crate::convert::ConvertService;
use crate::error::ConvertError;
use crate::io::ImageSource;

/// Response header reporting whether the image came from the cache.
pub const CACHE_HIT_HEADER: HeaderName = HeaderName::from_static("x-cache-hit");

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the conversion service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: ImageSource> {
    /// The conversion service for processing requests
    pub convert_service: Arc<ConvertService<S>>,

    /// Cache-Control max-age in seconds for converted images
    pub cache_max_age: u32,
}

impl<S: ImageSource> AppState<S> {
    /// Create a new application state with the given service.
    pub fn new(convert_service: ConvertService<S>) -> Self {
        Self::with_cache_max_age(convert_service, DEFAULT_CACHE_MAX_AGE)
    }

    /// Create a new application state with custom cache max-age.
    pub fn with_cache_max_age(convert_service: ConvertService<S>, cache_max_age: u32) -> Self {
        Self {
            convert_service: Arc::new(convert_service),
            cache_max_age,
        }
    }
}

impl<S: ImageSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            convert_service: Arc::clone(&self.convert_service),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Error type identifier (e.g., "invalid_input", "fetch_failed")
    pub code: String,

    /// HTTP status code of the response
    pub status: u16,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, code: impl Into<String>, status: StatusCode) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            status: status.as_u16(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Response from the cache stats endpoint.
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    /// Number of images currently cached
    pub cached_images: usize,

    /// Maximum number of cached images
    pub max_cache_size: usize,

    /// Hex cache keys, most-recently-used first
    pub cache_keys: Vec<String>,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ConvertError to HTTP response.
///
/// Client errors are logged at WARN level and server errors at ERROR level.
impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        let status = match &self {
            ConvertError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ConvertError::FetchFailed { .. }
            | ConvertError::DecodeFailed { .. }
            | ConvertError::EncodeFailed { .. }
            | ConvertError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let error_type = self.code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::new(message, error_type, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle conversion requests.
///
/// # Endpoint
///
/// `GET /convert-tiff?url=<absolute-url>`
///
/// # Response
///
/// `200 OK` with the PNG body, `Content-Type: image/png` and an
/// `X-Cache-Hit` header. `400` if `url` is missing or malformed, `500` if
/// the upstream fetch or the conversion fails. Errors are JSON
/// [`ErrorResponse`] bodies.
pub async fn convert_handler<S: ImageSource + 'static>(
    State(state): State<AppState<S>>,
    RawQuery(query): RawQuery,
) -> Result<Response, ConvertError> {
    let raw_url = first_url_param(query.as_deref());
    let url = match raw_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url,
        _ => return Err(ConvertError::invalid_input("No URL provided")),
    };

    let response = state.convert_service.resolve(url).await?;

    let headers = [
        (header::CONTENT_TYPE, "image/png".to_string()),
        (
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache_max_age),
        ),
        (CACHE_HIT_HEADER, response.cache_hit.to_string()),
    ];

    Ok((StatusCode::OK, headers, Body::from(response.data)).into_response())
}

/// Decoded value of the first `url` pair in a query string.
///
/// Later `url` pairs are ignored.
fn first_url_param(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(name, _)| name == "url")
        .map(|(_, value)| value.into_owned())
}

/// Handle cache statistics requests.
///
/// # Endpoint
///
/// `GET /cache-stats`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "cached_images": 2,
///   "max_cache_size": 10,
///   "cache_keys": ["9f86d0...", "60303a..."]
/// }
/// ```
pub async fn cache_stats_handler<S: ImageSource + 'static>(
    State(state): State<AppState<S>>,
) -> Json<CacheStatsResponse> {
    let stats = state.convert_service.stats().await;

    Json(CacheStatsResponse {
        cached_images: stats.count,
        max_cache_size: stats.capacity,
        cache_keys: stats.keys.iter().map(|key| key.to_hex()).collect(),
    })
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
