//! Full-screen capture through the `xcap` crate
//!
//! `xcap` covers X11, Wayland (through the desktop portal), Windows and macOS
//! with one monitor API, so this backend is the [`ScreenCapture`]
//! implementation on every platform. It captures the primary monitor, or the
//! first enumerated one when no monitor reports itself as primary.

use xcap::Monitor;

use super::{ImageBuffer, ScreenCapture};
use crate::error::{CaptureError, CaptureResult};

/// Screen capture backed by `xcap::Monitor`
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapBackend;

impl XcapBackend {
    /// Creates a new xcap backend
    pub fn new() -> Self {
        Self
    }

    fn map_xcap_error(err: xcap::XCapError) -> CaptureError {
        CaptureError::CaptureFailed {
            backend: "xcap",
            reason:  err.to_string(),
        }
    }

    fn primary_monitor() -> CaptureResult<Monitor> {
        let monitors = Monitor::all().map_err(|e| {
            tracing::error!("Failed to enumerate monitors: {}", e);
            Self::map_xcap_error(e)
        })?;

        tracing::debug!("Found {} monitor(s)", monitors.len());

        let mut fallback = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                return Ok(monitor);
            }
            if fallback.is_none() {
                fallback = Some(monitor);
            }
        }

        fallback.ok_or_else(|| CaptureError::CaptureFailed {
            backend: "xcap",
            reason:  "No monitors found".to_string(),
        })
    }
}

impl ScreenCapture for XcapBackend {
    fn name(&self) -> &'static str {
        "xcap"
    }

    fn capture_screen(&self) -> CaptureResult<ImageBuffer> {
        let monitor = Self::primary_monitor()?;

        if let Ok(name) = monitor.name() {
            tracing::debug!("Capturing monitor: {}", name);
        }

        let image = monitor.capture_image().map_err(|e| {
            tracing::error!("xcap monitor capture failed: {}", e);
            Self::map_xcap_error(e)
        })?;

        if image.width() == 0 || image.height() == 0 {
            return Err(CaptureError::CaptureFailed {
                backend: "xcap",
                reason:  "Captured an empty frame".to_string(),
            });
        }

        tracing::info!(
            "Captured screen: {}x{}",
            image.width(),
            image.height()
        );

        Ok(ImageBuffer::from(image))
    }
}
