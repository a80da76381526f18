//! Image buffer wrapper for screenshot data
//!
//! This module provides an `ImageBuffer` wrapper around `image::DynamicImage`
//! that every capture backend returns. It also hosts the pixel-layout
//! conversions backends need (e.g. Win32 BGRX bitmaps).
//!
//! # Examples
//!
//! ```
//! use screensnap::capture::ImageBuffer;
//!
//! let img = ImageBuffer::from_test_pattern(1920, 1080);
//! assert_eq!(img.dimensions(), (1920, 1080));
//! ```

use image::GenericImageView;

use crate::error::{CaptureError, CaptureResult};

/// Wrapper around `image::DynamicImage` holding one captured frame
#[derive(Clone, Debug)]
pub struct ImageBuffer {
    inner: image::DynamicImage,
}

impl ImageBuffer {
    /// Creates a new ImageBuffer from a DynamicImage
    ///
    /// # Examples
    ///
    /// ```
    /// use image::DynamicImage;
    /// use screensnap::capture::ImageBuffer;
    ///
    /// let dynamic = DynamicImage::new_rgb8(100, 100);
    /// let buffer = ImageBuffer::new(dynamic);
    /// ```
    pub fn new(image: image::DynamicImage) -> Self {
        Self { inner: image }
    }

    /// Builds an image from top-down 32-bit BGRX rows
    ///
    /// This is the layout produced by `GetDIBits` with a negative height and
    /// 32 bits per pixel. The fourth byte is ignored and alpha is set opaque.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::CaptureFailed`] if the buffer length does not
    /// match `width * height * 4`.
    ///
    /// # Examples
    ///
    /// ```
    /// use screensnap::capture::ImageBuffer;
    ///
    /// // One blue pixel, one red pixel
    /// let bgrx = vec![255u8, 0, 0, 0, 0, 0, 255, 0];
    /// let img = ImageBuffer::from_bgrx(2, 1, &bgrx).unwrap();
    /// assert_eq!(img.to_rgba8().as_raw(), &vec![0u8, 0, 255, 255, 255, 0, 0, 255]);
    /// ```
    pub fn from_bgrx(width: u32, height: u32, bgrx: &[u8]) -> CaptureResult<Self> {
        let expected = width as usize * height as usize * 4;
        if bgrx.len() != expected {
            return Err(CaptureError::CaptureFailed {
                backend: "bitmap",
                reason:  format!(
                    "Buffer size mismatch: expected {}, got {}",
                    expected,
                    bgrx.len()
                ),
            });
        }

        let rgba: Vec<u8> = bgrx
            .chunks_exact(4)
            .flat_map(|px| [px[2], px[1], px[0], 255])
            .collect();

        let img = image::RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
            CaptureError::CaptureFailed {
                backend: "bitmap",
                reason:  format!("Invalid bitmap dimensions {}x{}", width, height),
            }
        })?;

        Ok(Self::new(image::DynamicImage::ImageRgba8(img)))
    }

    /// Returns the dimensions of the image as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Returns the image width in pixels
    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    /// Returns the image height in pixels
    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// Converts the image to RGBA8 format
    pub fn to_rgba8(&self) -> image::RgbaImage {
        self.inner.to_rgba8()
    }

    /// Converts the image to RGB8 format, dropping alpha
    pub fn to_rgb8(&self) -> image::RgbImage {
        self.inner.to_rgb8()
    }

    /// Creates a test pattern image with the specified dimensions
    ///
    /// Generates a vertical gradient from blue (top) to cyan (bottom), useful
    /// for testing without a real capture backend.
    ///
    /// # Examples
    ///
    /// ```
    /// use screensnap::capture::ImageBuffer;
    ///
    /// let img = ImageBuffer::from_test_pattern(640, 480);
    /// assert_eq!(img.dimensions(), (640, 480));
    /// ```
    pub fn from_test_pattern(width: u32, height: u32) -> Self {
        use image::{ImageBuffer as ImgBuf, Rgba};

        let start_color = Rgba([0u8, 0u8, 255u8, 255u8]); // Blue
        let end_color = Rgba([0u8, 255u8, 255u8, 255u8]); // Cyan

        let img = ImgBuf::from_fn(width, height, |_x, y| {
            let ratio = y as f32 / height.max(1) as f32;
            Rgba([
                (start_color[0] as f32 * (1.0 - ratio) + end_color[0] as f32 * ratio) as u8,
                (start_color[1] as f32 * (1.0 - ratio) + end_color[1] as f32 * ratio) as u8,
                (start_color[2] as f32 * (1.0 - ratio) + end_color[2] as f32 * ratio) as u8,
                255,
            ])
        });

        Self::new(image::DynamicImage::ImageRgba8(img))
    }

    /// Returns a reference to the inner DynamicImage
    pub fn inner(&self) -> &image::DynamicImage {
        &self.inner
    }

    /// Consumes self and returns the inner DynamicImage
    pub fn into_inner(self) -> image::DynamicImage {
        self.inner
    }
}

impl From<image::RgbaImage> for ImageBuffer {
    fn from(img: image::RgbaImage) -> Self {
        Self::new(image::DynamicImage::ImageRgba8(img))
    }
}
