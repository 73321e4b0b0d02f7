//! Fetch-and-convert step of the pipeline.
//!
//! A [`Transcoder`] validates the URL, pulls the bytes through an
//! [`ImageSource`], and runs the TIFF→PNG conversion on the blocking thread
//! pool so large images do not stall the async executor. It holds no cache
//! state; every call performs exactly one upstream fetch.

use bytes::Bytes;
use tracing::debug;
use url::Url;

use crate::error::ConvertError;
use crate::io::ImageSource;

use super::encoder::TiffPngEncoder;

/// Fetches remote TIFF images and converts them to PNG.
pub struct Transcoder<S: ImageSource> {
    source: S,
    encoder: TiffPngEncoder,
}

impl<S: ImageSource> Transcoder<S> {
    /// Create a transcoder that fetches through `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            encoder: TiffPngEncoder::new(),
        }
    }

    /// Get the underlying image source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch `url` and return its PNG re-encoding.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::InvalidInput`] if `url` is not an absolute http(s) URL
    /// - [`ConvertError::FetchFailed`] on transport errors, timeouts, or
    ///   non-success statuses
    /// - [`ConvertError::DecodeFailed`] if the body is not a TIFF image
    /// - [`ConvertError::EncodeFailed`] if PNG encoding fails
    /// - [`ConvertError::Internal`] if the conversion task panics
    pub async fn convert(&self, url: &str) -> Result<Bytes, ConvertError> {
        let url = parse_source_url(url)?;

        let body = self.source.fetch(&url).await?;
        let source_len = body.len();

        let encoder = self.encoder.clone();
        let png = tokio::task::spawn_blocking(move || encoder.encode(&body))
            .await
            .map_err(|e| ConvertError::internal(format!("conversion task failed: {}", e)))??;

        debug!(
            url = %url,
            source_bytes = source_len,
            png_bytes = png.len(),
            "Converted TIFF to PNG"
        );

        Ok(png)
    }
}

/// Parse and validate a source URL.
///
/// Only absolute `http` and `https` URLs with a host are accepted.
pub fn parse_source_url(raw: &str) -> Result<Url, ConvertError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConvertError::invalid_input("No URL provided"));
    }

    let url = Url::parse(raw)
        .map_err(|e| ConvertError::invalid_input(format!("malformed URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConvertError::invalid_input(format!(
                "unsupported URL scheme '{}' (expected http or https)",
                other
            )))
        }
    }

    if !url.has_host() {
        return Err(ConvertError::invalid_input(format!(
            "URL '{}' has no host",
            raw
        )));
    }

    Ok(url)
}

// =============================================================================
// Tests
// =============================================================================
