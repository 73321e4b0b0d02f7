//! Configuration management for the TIFF proxy.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `TIFF_PROXY_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use tiff_proxy::config::Config;
//!
//! let config = Config::parse();
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `TIFF_PROXY_HOST` - Server bind address (default: 127.0.0.1)
//! - `TIFF_PROXY_PORT` - Server port (default: 5000)
//! - `TIFF_PROXY_CACHE_CAPACITY` - Max converted images to cache (default: 10)
//! - `TIFF_PROXY_FETCH_TIMEOUT` - Upstream fetch timeout in seconds (default: 30)
//! - `TIFF_PROXY_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)
//! - `TIFF_PROXY_STATIC_DIR` - Directory of static assets to serve (optional)
//! - `TIFF_PROXY_CORS_ORIGINS` - Allowed CORS origins, comma-separated (optional)

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::convert::DEFAULT_CACHE_CAPACITY;
use crate::io::DEFAULT_FETCH_TIMEOUT;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default HTTP cache max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// CLI Arguments
// =============================================================================

/// TIFF Proxy - converts remote TIFF images to PNG on demand.
///
/// Fetches `GET /convert-tiff?url=...` sources over HTTP, re-encodes them as
/// PNG and keeps the most recently used results in memory.
#[derive(Parser, Debug, Clone)]
#[command(name = "tiff-proxy")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "TIFF_PROXY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TIFF_PROXY_PORT")]
    pub port: u16,

    /// Directory of static assets served for paths that match no API route.
    #[arg(long, env = "TIFF_PROXY_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    // =========================================================================
    // Conversion Configuration
    // =========================================================================
    /// Maximum number of converted images to keep in memory.
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY, env = "TIFF_PROXY_CACHE_CAPACITY")]
    pub cache_capacity: usize,

    /// Upstream fetch timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs(), env = "TIFF_PROXY_FETCH_TIMEOUT")]
    pub fetch_timeout: u64,

    /// HTTP Cache-Control max-age in seconds for converted images.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "TIFF_PROXY_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "TIFF_PROXY_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_capacity == 0 {
            return Err("cache_capacity must be greater than 0".to_string());
        }

        if self.fetch_timeout == 0 {
            return Err("fetch_timeout must be greater than 0".to_string());
        }

        if let Some(ref dir) = self.static_dir {
            if !dir.is_dir() {
                return Err(format!(
                    "static_dir '{}' does not exist or is not a directory",
                    dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the upstream fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

// =============================================================================
// Tests
// =============================================================================
