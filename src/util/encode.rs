//! Image encoding
//!
//! Converts an [`ImageBuffer`] into the bytes of a PNG or JPEG file. `jpg`
//! and `jpeg` share the JPEG encoder; only the file extension differs.
//!
//! # Format Support
//!
//! - **PNG**: lossless, default compression with adaptive filtering
//! - **JPEG**: lossy, fixed quality, alpha channel dropped
//!
//! # Examples
//!
//! ```
//! use screensnap::{capture::ImageBuffer, model::ImageFormat, util::encode::encode_image};
//!
//! let img = ImageBuffer::from_test_pattern(320, 240);
//! let png_bytes = encode_image(&img, ImageFormat::Png).unwrap();
//! assert_eq!(&png_bytes[..4], b"\x89PNG");
//! ```

use std::io::Cursor;

use image::{
    ImageEncoder,
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType, PngEncoder},
    },
};

use crate::{
    capture::ImageBuffer,
    error::{CaptureError, CaptureResult},
    model::{Encoding, ImageFormat},
};

/// JPEG quality used for every JPEG capture
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Encodes an image as PNG
///
/// Uses default compression and adaptive filtering.
pub fn encode_png(buffer: &ImageBuffer) -> CaptureResult<Vec<u8>> {
    let mut output = Vec::new();

    // Adaptive filter picks the best filter per scanline
    let encoder = PngEncoder::new_with_quality(
        Cursor::new(&mut output),
        CompressionType::Default,
        FilterType::Adaptive,
    );

    let rgba = buffer.to_rgba8();
    let (width, height) = rgba.dimensions();

    encoder
        .write_image(rgba.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| CaptureError::EncodingFailed {
            format: "png".to_string(),
            reason: e.to_string(),
        })?;

    Ok(output)
}

/// Encodes an image as JPEG with the given quality (clamped to 1-100)
///
/// JPEG has no alpha channel, so the image is converted to RGB first.
pub fn encode_jpeg(buffer: &ImageBuffer, quality: u8) -> CaptureResult<Vec<u8>> {
    let quality = quality.clamp(1, 100);

    let rgb = buffer.to_rgb8();
    let (width, height) = rgb.dimensions();

    if width == 0 || height == 0 {
        return Err(CaptureError::EncodingFailed {
            format: "jpeg".to_string(),
            reason: "Image dimensions must be > 0".to_string(),
        });
    }

    let mut output = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut output), quality);

    encoder
        .write_image(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| CaptureError::EncodingFailed {
            format: "jpeg".to_string(),
            reason: e.to_string(),
        })?;

    Ok(output)
}

/// Encodes an image in the given format
pub fn encode_image(buffer: &ImageBuffer, format: ImageFormat) -> CaptureResult<Vec<u8>> {
    let bytes = match format.encoding() {
        Encoding::Png => encode_png(buffer)?,
        Encoding::Jpeg => encode_jpeg(buffer, DEFAULT_JPEG_QUALITY)?,
    };

    tracing::debug!(
        "Encoded {}x{} image as {}: {} bytes",
        buffer.width(),
        buffer.height(),
        format,
        bytes.len()
    );

    Ok(bytes)
}
