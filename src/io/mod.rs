//! I/O layer for fetching source images from upstream servers.
//!
//! [`ImageSource`] is the seam between the conversion pipeline and the
//! network. [`HttpImageSource`] is the production implementation; tests
//! substitute in-memory sources.

mod http_source;
mod image_source;

pub use http_source::{HttpImageSource, DEFAULT_FETCH_TIMEOUT};
pub use image_source::ImageSource;
