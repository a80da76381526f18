//! Mock capture backend for testing
//!
//! This module provides a `MockBackend` that implements both
//! [`ScreenCapture`] and [`WindowCapture`] without touching a real windowing
//! system. It generates synthetic test-pattern images and serves a fixed list
//! of windows.
//!
//! # Features
//!
//! - **Synthetic Images:** Full-screen and window captures return gradients at
//!   fixed, distinct sizes so tests can tell them apart
//! - **Mock Window List:** 3 predefined windows (Firefox, VSCode, Terminal)
//! - **Capability Toggles:** Disable window capture or the display session to
//!   exercise the fallback and failure paths
//! - **Failure Injection:** Make every operation fail with a capture error
//!
//! # Examples
//!
//! ```
//! use screensnap::capture::{MockBackend, ScreenCapture, WindowCapture};
//!
//! let backend = MockBackend::new();
//! let windows = backend.list_windows().unwrap();
//! assert_eq!(windows.len(), 3);
//!
//! let image = backend.capture_window(&windows[0].id).unwrap();
//! assert_eq!(image.dimensions(), MockBackend::WINDOW_SIZE);
//!
//! let screen = backend.capture_screen().unwrap();
//! assert_eq!(screen.dimensions(), MockBackend::SCREEN_SIZE);
//! ```

use super::{ImageBuffer, ScreenCapture, WindowCapture};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{WindowHandle, WindowInfo},
};

/// Mock capture backend for testing and development
///
/// Cloning is cheap; [`composite_from_mock`](super::composite_from_mock)
/// clones the mock so one instance can serve both capabilities.
#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Predefined mock windows
    windows:        Vec<WindowInfo>,
    /// Whether window capture is offered at all
    window_capture: bool,
    /// Whether a display session is present
    display:        bool,
    /// Failure message returned by every operation when set
    failure:        Option<String>,
}

impl MockBackend {
    /// Size of a full-screen capture
    pub const SCREEN_SIZE: (u32, u32) = (640, 360);
    /// Size of a window capture
    pub const WINDOW_SIZE: (u32, u32) = (320, 240);

    /// Creates a new MockBackend with default mock windows
    ///
    /// The backend includes 3 predefined windows, in this enumeration order:
    /// - "Mozilla Firefox"
    /// - "Visual Studio Code"
    /// - "Terminal - Alacritty"
    pub fn new() -> Self {
        Self {
            windows:        Self::create_mock_windows(),
            window_capture: true,
            display:        true,
            failure:        None,
        }
    }

    /// Replaces the mock window list
    ///
    /// # Examples
    ///
    /// ```
    /// use screensnap::{
    ///     capture::{MockBackend, WindowCapture},
    ///     model::WindowInfo,
    /// };
    ///
    /// let backend = MockBackend::new().with_windows(vec![WindowInfo::new("1", "Notepad")]);
    /// assert_eq!(backend.list_windows().unwrap().len(), 1);
    /// ```
    pub fn with_windows(mut self, windows: Vec<WindowInfo>) -> Self {
        self.windows = windows;
        self
    }

    /// Turns off window capture, as on a platform without it
    pub fn without_window_capture(mut self) -> Self {
        self.window_capture = false;
        self
    }

    /// Simulates a session with no display attached
    pub fn without_display(mut self) -> Self {
        self.display = false;
        self
    }

    /// Makes every operation fail with [`CaptureError::CaptureFailed`]
    pub fn with_failure(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Returns true unless [`without_window_capture`](Self::without_window_capture) was applied
    pub fn supports_window_capture(&self) -> bool {
        self.window_capture
    }

    /// Returns true unless [`without_display`](Self::without_display) was applied
    pub fn has_display(&self) -> bool {
        self.display
    }

    fn create_mock_windows() -> Vec<WindowInfo> {
        vec![
            WindowInfo::new("mock-0x1", "Mozilla Firefox"),
            WindowInfo::new("mock-0x2", "Visual Studio Code"),
            WindowInfo::new("mock-0x3", "Terminal - Alacritty"),
        ]
    }

    fn check_failure(&self) -> CaptureResult<()> {
        match &self.failure {
            Some(reason) => Err(CaptureError::CaptureFailed {
                backend: "mock",
                reason:  reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenCapture for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn capture_screen(&self) -> CaptureResult<ImageBuffer> {
        self.check_failure()?;
        let (width, height) = Self::SCREEN_SIZE;
        Ok(ImageBuffer::from_test_pattern(width, height))
    }
}

impl WindowCapture for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn list_windows(&self) -> CaptureResult<Vec<WindowInfo>> {
        self.check_failure()?;
        Ok(self.windows.clone())
    }

    fn capture_window(&self, handle: &WindowHandle) -> CaptureResult<ImageBuffer> {
        self.check_failure()?;

        // Handle went stale between enumeration and capture
        if !self.windows.iter().any(|w| w.id == *handle) {
            return Err(CaptureError::WindowClosed);
        }

        let (width, height) = Self::WINDOW_SIZE;
        Ok(ImageBuffer::from_test_pattern(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_backend_new() {
        let backend = MockBackend::new();
        assert_eq!(backend.windows.len(), 3);
        assert!(backend.supports_window_capture());
        assert!(backend.has_display());
        assert!(backend.failure.is_none());
    }

    #[test]
    fn test_mock_backend_default() {
        let backend = MockBackend::default();
        assert_eq!(backend.windows.len(), 3);
    }

    #[test]
    fn test_mock_windows_data() {
        let backend = MockBackend::new();
        let titles: Vec<&str> = backend.windows.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Mozilla Firefox", "Visual Studio Code", "Terminal - Alacritty"]
        );
    }

    #[test]
    fn test_capture_screen_size() {
        let image = MockBackend::new().capture_screen().unwrap();
        assert_eq!(image.dimensions(), MockBackend::SCREEN_SIZE);
    }

    #[test]
    fn test_capture_window_by_handle() {
        let image = MockBackend::new()
            .capture_window(&"mock-0x2".to_string())
            .unwrap();
        assert_eq!(image.dimensions(), MockBackend::WINDOW_SIZE);
    }

    #[test]
    fn test_capture_window_stale_handle() {
        let result = MockBackend::new().capture_window(&"mock-0x99".to_string());
        assert!(matches!(result, Err(CaptureError::WindowClosed)));
    }

    #[test]
    fn test_failure_injection_applies_to_all_operations() {
        let backend = MockBackend::new().with_failure("boom");

        assert!(matches!(
            backend.capture_screen(),
            Err(CaptureError::CaptureFailed { backend: "mock", .. })
        ));
        assert!(backend.list_windows().is_err());
        assert!(backend.capture_window(&"mock-0x1".to_string()).is_err());
    }

    #[test]
    fn test_with_windows_replaces_list() {
        let backend = MockBackend::new().with_windows(vec![]);
        assert!(backend.list_windows().unwrap().is_empty());
    }

    #[test]
    fn test_toggles() {
        let backend = MockBackend::new().without_window_capture().without_display();
        assert!(!backend.supports_window_capture());
        assert!(!backend.has_display());
    }
}
