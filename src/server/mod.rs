//! HTTP server layer for the TIFF proxy.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │      GET /convert-tiff?url=...      GET /cache-stats            │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │           routes            │  │
//! │  │ (requests, error JSON)   │  │ (router, CORS, static dir)  │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    cache_stats_handler, convert_handler, health_handler, AppState, CacheStatsResponse,
    ErrorResponse, HealthResponse, CACHE_HIT_HEADER,
};
pub use routes::{create_router, RouterConfig};
