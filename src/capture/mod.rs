//! Capture backend traits and implementations
//!
//! This module provides the abstractions for acquiring pixels from the
//! operating system using composable capability traits:
//!
//! - [`ScreenCapture`] - Capture the whole desktop (every supported platform)
//! - [`WindowCapture`] - Enumerate visible top-level windows and capture one
//!   (Windows only)
//!
//! Backends implement only the traits they support. [`CompositeBackend`]
//! holds one optional implementation per capability and records *why* a
//! capability is missing, so callers fall back deliberately instead of
//! catching errors at capture time.
//!
//! ## Backend Capabilities
//!
//! | Backend | ScreenCapture | WindowCapture |
//! |---------|---------------|---------------|
//! | xcap    | ✓ | - |
//! | GDI     | - | ✓ |
//! | Mock    | ✓ | ✓ (configurable) |
//!
//! ## Recommended Usage
//!
//! ```rust,no_run
//! use screensnap::capture::create_default_backend;
//!
//! let backend = create_default_backend();
//! let acquired = backend.capture_window_by_title("Notepad")?;
//! if let Some(notice) = acquired.source.fallback() {
//!     eprintln!("Warning: {}", notice);
//! }
//! # Ok::<(), screensnap::CaptureError>(())
//! ```

use crate::{
    error::CaptureResult,
    model::{WindowHandle, WindowInfo},
};

pub mod composite;
pub mod image_buffer;
pub mod matching;
pub mod mock;

#[cfg(feature = "xcap-backend")]
pub mod xcap_backend;

#[cfg(all(target_os = "windows", feature = "windows-backend"))]
pub mod windows_backend;

pub use composite::{AcquiredImage, CompositeBackend, composite_from_mock, create_default_backend};
pub use image_buffer::ImageBuffer;
pub use mock::MockBackend;
#[cfg(all(target_os = "windows", feature = "windows-backend"))]
pub use windows_backend::WindowsBackend;
#[cfg(feature = "xcap-backend")]
pub use xcap_backend::XcapBackend;

/// Capability: backend can capture the entire visible desktop.
pub trait ScreenCapture {
    /// Short backend name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Captures the primary display as a raster image.
    ///
    /// # Errors
    ///
    /// Fails with a capture-class [`CaptureError`](crate::CaptureError) only
    /// on unrecoverable OS errors (no display session, capture refused).
    fn capture_screen(&self) -> CaptureResult<ImageBuffer>;
}

/// Capability: backend can enumerate windows and capture a single window.
pub trait WindowCapture {
    /// Short backend name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Lists currently visible top-level windows, in platform order.
    fn list_windows(&self) -> CaptureResult<Vec<WindowInfo>>;

    /// Captures one window's client area.
    ///
    /// All OS handles acquired for the capture are released before this
    /// returns, on success and on failure.
    fn capture_window(&self, handle: &WindowHandle) -> CaptureResult<ImageBuffer>;
}
