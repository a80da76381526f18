//! Composite backend that holds optional capability trait objects
//!
//! Capability selection happens once, when the composite is built. Each
//! capability is either a boxed implementation or the
//! [`CapabilityUnavailable`] reason it is missing. The capture path consults
//! that result instead of re-probing the platform or catching errors, which
//! keeps the window-to-full-screen fallback auditable.
//!
//! # Example
//!
//! ```
//! use screensnap::{
//!     capture::{MockBackend, composite_from_mock},
//!     model::CaptureSource,
//! };
//!
//! let backend = composite_from_mock(MockBackend::new().without_window_capture());
//! assert!(!backend.capabilities().supports_window_capture());
//!
//! // Not an error: downgraded to a full-screen capture with a notice
//! let acquired = backend.capture_window_by_title("Firefox").unwrap();
//! assert!(matches!(acquired.source, CaptureSource::FullScreen { fallback: Some(_) }));
//! ```

use std::fmt;

use super::{ImageBuffer, MockBackend, ScreenCapture, WindowCapture, matching};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{
        BackendType, Capabilities, CapabilityUnavailable, CaptureSource, FallbackReason,
        PlatformInfo, WindowInfo,
    },
    util::detect::detect_platform,
};

/// An image together with a description of what was captured
#[derive(Debug, Clone)]
pub struct AcquiredImage {
    /// Captured pixels
    pub image:  ImageBuffer,
    /// Window or full screen, plus any fallback notice
    pub source: CaptureSource,
}

/// Composite backend holding optional capability trait objects.
///
/// - `screen`: full-screen capture (xcap, mock)
/// - `windows`: window enumeration and capture (GDI, mock)
pub struct CompositeBackend {
    screen:  Result<Box<dyn ScreenCapture>, CapabilityUnavailable>,
    windows: Result<Box<dyn WindowCapture>, CapabilityUnavailable>,
}

impl CompositeBackend {
    /// Creates a new CompositeBackend from resolved capabilities.
    pub fn new(
        screen: Result<Box<dyn ScreenCapture>, CapabilityUnavailable>,
        windows: Result<Box<dyn WindowCapture>, CapabilityUnavailable>,
    ) -> Self {
        Self { screen, windows }
    }

    /// Reports which capabilities this backend resolved to.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            full_screen:    self.screen.as_ref().map(|_| ()).map_err(Clone::clone),
            window_capture: self.windows.as_ref().map(|_| ()).map_err(Clone::clone),
        }
    }

    /// Captures the entire desktop.
    ///
    /// # Errors
    ///
    /// - [`CaptureError::BackendNotAvailable`] if no full-screen backend was
    ///   resolved
    /// - any capture-class error raised by the backend
    pub fn capture_full_screen(&self) -> CaptureResult<ImageBuffer> {
        match &self.screen {
            Ok(screen) => {
                tracing::debug!("Capturing full screen via {}", screen.name());
                screen.capture_screen()
            }
            Err(reason) => {
                tracing::error!("Full-screen capture unavailable: {}", reason);
                Err(CaptureError::BackendNotAvailable {
                    backend: "full-screen",
                    reason:  reason.to_string(),
                })
            }
        }
    }

    /// Captures the first visible window whose title contains `filter`.
    ///
    /// Falls back to a full-screen capture, with a warning, when window
    /// capture is unavailable or no window matches. The fallback is reported
    /// through [`AcquiredImage::source`], not as an error.
    pub fn capture_window_by_title(&self, filter: &str) -> CaptureResult<AcquiredImage> {
        let windows = match &self.windows {
            Ok(windows) => windows,
            Err(reason) => return self.fall_back(FallbackReason::Unavailable(reason.clone())),
        };

        let candidates = windows.list_windows()?;
        tracing::debug!(
            "{} enumerated {} visible windows",
            windows.name(),
            candidates.len()
        );

        let Some(target) = matching::find_by_title(filter, &candidates) else {
            return self.fall_back(FallbackReason::WindowNotFound {
                filter: filter.to_string(),
            });
        };

        tracing::info!("Capturing window '{}' via {}", target.title, windows.name());
        let image = windows.capture_window(&target.id)?;

        Ok(AcquiredImage {
            image,
            source: CaptureSource::Window {
                title: target.title.clone(),
            },
        })
    }

    /// Lists visible windows, if window capture is available.
    ///
    /// # Errors
    ///
    /// [`CaptureError::BackendNotAvailable`] when the platform or build has
    /// no window capture.
    pub fn list_windows(&self) -> CaptureResult<Vec<WindowInfo>> {
        match &self.windows {
            Ok(windows) => windows.list_windows(),
            Err(reason) => Err(CaptureError::BackendNotAvailable {
                backend: "window",
                reason:  reason.to_string(),
            }),
        }
    }

    fn fall_back(&self, reason: FallbackReason) -> CaptureResult<AcquiredImage> {
        tracing::warn!("{}", reason);
        let image = self.capture_full_screen()?;

        Ok(AcquiredImage {
            image,
            source: CaptureSource::FullScreen {
                fallback: Some(reason),
            },
        })
    }
}

impl fmt::Debug for CompositeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeBackend")
            .field("screen", &self.screen.as_ref().map(|s| s.name()))
            .field("windows", &self.windows.as_ref().map(|w| w.name()))
            .finish()
    }
}

/// Creates the capture backend for the current platform.
///
/// Capabilities are resolved here, once:
///
/// - **Full screen**: `xcap` when built with `xcap-backend` and a display
///   session is present
/// - **Window**: Win32 GDI when running on Windows and built with
///   `windows-backend`
pub fn create_default_backend() -> CompositeBackend {
    let platform = detect_platform();
    tracing::debug!("Detected platform: {} ({})", platform.os, platform.backend);

    let backend = CompositeBackend::new(screen_backend(&platform), window_backend(&platform));
    tracing::debug!("Resolved backend: {:?}", backend);
    backend
}

/// Wraps a [`MockBackend`] in a composite, honoring its configured capabilities.
pub fn composite_from_mock(mock: MockBackend) -> CompositeBackend {
    let screen: Result<Box<dyn ScreenCapture>, CapabilityUnavailable> = if mock.has_display() {
        Ok(Box::new(mock.clone()))
    } else {
        Err(CapabilityUnavailable::NoDisplaySession)
    };

    let windows: Result<Box<dyn WindowCapture>, CapabilityUnavailable> =
        if mock.supports_window_capture() {
            Ok(Box::new(mock))
        } else {
            Err(CapabilityUnavailable::UnsupportedPlatform {
                os: "mock".to_string(),
            })
        };

    CompositeBackend::new(screen, windows)
}

fn screen_backend(
    platform: &PlatformInfo,
) -> Result<Box<dyn ScreenCapture>, CapabilityUnavailable> {
    if platform.backend == BackendType::None {
        return Err(CapabilityUnavailable::NoDisplaySession);
    }

    #[cfg(feature = "xcap-backend")]
    {
        Ok(Box::new(super::XcapBackend::new()))
    }

    #[cfg(not(feature = "xcap-backend"))]
    {
        Err(CapabilityUnavailable::FeatureDisabled {
            feature: "xcap-backend",
        })
    }
}

#[cfg_attr(target_os = "windows", allow(unused_variables))]
fn window_backend(
    platform: &PlatformInfo,
) -> Result<Box<dyn WindowCapture>, CapabilityUnavailable> {
    #[cfg(all(target_os = "windows", feature = "windows-backend"))]
    {
        Ok(Box::new(super::WindowsBackend::new()))
    }

    #[cfg(all(target_os = "windows", not(feature = "windows-backend")))]
    {
        Err(CapabilityUnavailable::FeatureDisabled {
            feature: "windows-backend",
        })
    }

    #[cfg(not(target_os = "windows"))]
    {
        Err(CapabilityUnavailable::UnsupportedPlatform {
            os: platform.os.clone(),
        })
    }
}
