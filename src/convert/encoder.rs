//! TIFF to PNG encoder.
//!
//! Decodes a complete TIFF file and re-encodes the first image as PNG.
//!
//! # Design Decisions
//!
//! - **Fast compression**: PNG output uses the fastest deflate setting. Output
//!   is lossless either way; only file size changes.
//!
//! - **Strict source format**: input is always decoded as TIFF. Other image
//!   formats are rejected even if the `image` crate could read them.
//!
//! - **Float samples**: PNG has no floating point color types, so 32-bit float
//!   images are converted to 16-bit integer samples before encoding.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};

use crate::error::ConvertError;

/// The eight-byte signature every PNG stream starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// =============================================================================
// PNG Encoder
// =============================================================================

/// Stateless TIFF decoder and PNG encoder.
///
/// # Example
///
/// ```ignore
/// use tiff_proxy::convert::TiffPngEncoder;
///
/// let encoder = TiffPngEncoder::new();
/// let png = encoder.encode(&tiff_bytes)?;
/// assert!(png.starts_with(&tiff_proxy::convert::PNG_SIGNATURE));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TiffPngEncoder {}

impl TiffPngEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self {}
    }

    /// Decode TIFF bytes and re-encode them as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::DecodeFailed`] if `source` is not a decodable
    /// TIFF, and [`ConvertError::EncodeFailed`] if PNG encoding fails.
    pub fn encode(&self, source: &[u8]) -> Result<Bytes, ConvertError> {
        let img = decode_tiff(source)?;
        let img = to_png_compatible(img);

        let mut output = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut output, CompressionType::Fast, FilterType::Adaptive);

        img.write_with_encoder(encoder)
            .map_err(|e| ConvertError::EncodeFailed {
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }
}

fn decode_tiff(source: &[u8]) -> Result<DynamicImage, ConvertError> {
    if source.is_empty() {
        return Err(ConvertError::DecodeFailed {
            message: "empty response body".to_string(),
        });
    }

    ImageReader::with_format(Cursor::new(source), ImageFormat::Tiff)
        .decode()
        .map_err(|e| ConvertError::DecodeFailed {
            message: e.to_string(),
        })
}

fn to_png_compatible(img: DynamicImage) -> DynamicImage {
    match img.color() {
        ColorType::Rgb32F => DynamicImage::ImageRgb16(img.to_rgb16()),
        ColorType::Rgba32F => DynamicImage::ImageRgba16(img.to_rgba16()),
        _ => img,
    }
}

/// Check whether `data` starts with the PNG signature.
#[inline]
pub fn is_png(data: &[u8]) -> bool {
    data.starts_with(&PNG_SIGNATURE)
}

// =============================================================================
// Tests
// =============================================================================
