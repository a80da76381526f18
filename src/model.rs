//! Data models and type definitions for screensnap
//!
//! This module defines the core types used throughout the crate:
//! - Image format selection and its encoder mapping
//! - Platform and display backend detection types
//! - Capture requests, resolved targets and capture outputs
//! - Window metadata and backend capability reporting

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

/// Opaque window identifier, as produced by a window-capable backend
pub type WindowHandle = String;

/// Requested image format
///
/// `Jpg` and `Jpeg` use the same encoder but keep their own spelling so the
/// resulting file extension matches what the caller asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossless PNG
    #[default]
    Png,
    /// JPEG, written with a `.jpg` extension
    Jpg,
    /// JPEG, written with a `.jpeg` extension
    Jpeg,
}

/// Encoder actually used to write an [`ImageFormat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// PNG encoder
    Png,
    /// JPEG encoder
    Jpeg,
}

impl ImageFormat {
    /// All accepted formats, in the order they are listed to users
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpg, ImageFormat::Jpeg];

    /// Parses a format name case-insensitively
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::InvalidFormat`] for anything other than
    /// `png`, `jpg` or `jpeg`.
    ///
    /// # Examples
    ///
    /// ```
    /// use screensnap::model::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::normalize("JPG").unwrap(), ImageFormat::Jpg);
    /// assert!(ImageFormat::normalize("gif").is_err());
    /// ```
    pub fn normalize(format: &str) -> Result<Self, CaptureError> {
        match format.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" => Ok(ImageFormat::Jpg),
            "jpeg" => Ok(ImageFormat::Jpeg),
            _ => Err(CaptureError::InvalidFormat {
                format: format.to_string(),
            }),
        }
    }

    /// Returns the file extension (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    /// Returns the encoder used for this format
    pub fn encoding(&self) -> Encoding {
        match self {
            ImageFormat::Png => Encoding::Png,
            ImageFormat::Jpg | ImageFormat::Jpeg => Encoding::Jpeg,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

/// Represents the display backend type for the current platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// No display session detected
    None,
    /// Wayland display server (Linux)
    Wayland,
    /// X11 display server (Linux)
    X11,
    /// Windows desktop
    Windows,
    /// macOS desktop
    #[serde(rename = "macos")]
    MacOS,
}

impl BackendType {
    /// Returns the backend type as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::None => "none",
            BackendType::Wayland => "wayland",
            BackendType::X11 => "x11",
            BackendType::Windows => "windows",
            BackendType::MacOS => "macos",
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform information including OS and display backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Operating system name (e.g., "linux", "windows", "macos")
    pub os:      String,
    /// Detected display backend
    pub backend: BackendType,
}

impl PlatformInfo {
    /// Creates a new PlatformInfo instance
    pub fn new(os: String, backend: BackendType) -> Self {
        Self { os, backend }
    }
}

/// A single capture call, as seen by the [`Capturer`](crate::Capturer)
///
/// An empty or absent `raw_filename` requests an auto-generated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Filename supplied by the caller, unvalidated
    pub raw_filename:        Option<String>,
    /// Output format
    pub format:              ImageFormat,
    /// Directory the screenshot is written to
    pub output_directory:    PathBuf,
    /// Capture the first window whose title contains this substring
    pub window_title_filter: Option<String>,
}

/// Final location of a screenshot, derived from a validated [`CaptureRequest`]
///
/// The parent of `absolute_path` is always the request's output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Absolute output path
    pub absolute_path: PathBuf,
    /// Output format
    pub format:        ImageFormat,
}

/// Why a window capture was downgraded to a full-screen capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No visible window title contained the filter
    WindowNotFound {
        /// The title filter that matched nothing
        filter: String,
    },
    /// Window capture is not available in this build or on this platform
    Unavailable(CapabilityUnavailable),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::WindowNotFound { filter } => {
                write!(f, "Window '{}' not found, capturing full screen", filter)
            }
            FallbackReason::Unavailable(reason) => {
                write!(f, "Window capture not supported ({}), capturing full screen", reason)
            }
        }
    }
}

/// What was actually captured
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    /// The whole desktop, possibly as a fallback from a window capture
    FullScreen {
        /// Set when a window capture was requested but not performed
        fallback: Option<FallbackReason>,
    },
    /// A single window
    Window {
        /// Title of the captured window
        title: String,
    },
}

impl CaptureSource {
    /// Returns the fallback notice, if this capture was downgraded
    pub fn fallback(&self) -> Option<&FallbackReason> {
        match self {
            CaptureSource::FullScreen { fallback } => fallback.as_ref(),
            CaptureSource::Window { .. } => None,
        }
    }
}

/// Successful capture: a file exists at `path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutput {
    /// Absolute path of the written file
    pub path:      PathBuf,
    /// Number of bytes written
    pub byte_size: u64,
    /// What was captured
    pub source:    CaptureSource,
}

/// Metadata for a capturable top-level window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    /// Backend-specific window identifier
    pub id:    WindowHandle,
    /// Window title
    pub title: String,
}

impl WindowInfo {
    /// Creates a new WindowInfo
    pub fn new(id: impl Into<WindowHandle>, title: impl Into<String>) -> Self {
        Self {
            id:    id.into(),
            title: title.into(),
        }
    }
}

/// Why a capture capability is absent
///
/// Computed once when the backend is built, so fallbacks can be audited
/// without probing the platform on every call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityUnavailable {
    /// The platform has no supported API for this capability
    #[error("not supported on {os}")]
    UnsupportedPlatform {
        /// Operating system name
        os: String,
    },
    /// The crate was built without the feature providing this capability
    #[error("built without the '{feature}' feature")]
    FeatureDisabled {
        /// Cargo feature name
        feature: &'static str,
    },
    /// No graphical session was detected
    #[error("no display session detected")]
    NoDisplaySession,
}

/// Capabilities of a constructed backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Full-screen capture availability
    pub full_screen:    Result<(), CapabilityUnavailable>,
    /// Window enumeration and capture availability
    pub window_capture: Result<(), CapabilityUnavailable>,
}

impl Capabilities {
    /// Returns true if full-screen capture is available
    pub fn supports_full_screen(&self) -> bool {
        self.full_screen.is_ok()
    }

    /// Returns true if window capture is available
    pub fn supports_window_capture(&self) -> bool {
        self.window_capture.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_insensitive() {
        assert_eq!(ImageFormat::normalize("png").unwrap(), ImageFormat::Png);
        assert_eq!(ImageFormat::normalize("PNG").unwrap(), ImageFormat::Png);
        assert_eq!(ImageFormat::normalize("Jpg").unwrap(), ImageFormat::Jpg);
        assert_eq!(ImageFormat::normalize("JPEG").unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_normalize_rejects_unknown() {
        for bad in ["gif", "bmp", "webp", "", " png", "jp g", "png "] {
            let err = ImageFormat::normalize(bad).unwrap_err();
            assert!(matches!(err, CaptureError::InvalidFormat { ref format } if format == bad));
        }
    }

    #[test]
    fn test_jpg_and_jpeg_share_encoder_but_not_extension() {
        assert_eq!(ImageFormat::Jpg.encoding(), Encoding::Jpeg);
        assert_eq!(ImageFormat::Jpeg.encoding(), Encoding::Jpeg);
        assert_eq!(ImageFormat::Jpg.extension(), "jpg");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ImageFormat::Png.encoding(), Encoding::Png);
    }

    #[test]
    fn test_image_format_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ImageFormat::Jpg).unwrap(), r#""jpg""#);
        assert_eq!(serde_json::from_str::<ImageFormat>(r#""jpeg""#).unwrap(), ImageFormat::Jpeg);
        assert!(serde_json::from_str::<ImageFormat>(r#""tiff""#).is_err());
    }

    #[test]
    fn test_image_format_from_str() {
        let format: ImageFormat = "JPEG".parse().unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
        assert_eq!(format.to_string(), "jpeg");
    }

    #[test]
    fn test_backend_type_display() {
        assert_eq!(format!("{}", BackendType::None), "none");
        assert_eq!(format!("{}", BackendType::Wayland), "wayland");
        assert_eq!(format!("{}", BackendType::MacOS), "macos");
    }

    #[test]
    fn test_fallback_reason_display() {
        let reason = FallbackReason::WindowNotFound {
            filter: "Chrome".to_string(),
        };
        assert_eq!(reason.to_string(), "Window 'Chrome' not found, capturing full screen");

        let reason = FallbackReason::Unavailable(CapabilityUnavailable::UnsupportedPlatform {
            os: "linux".to_string(),
        });
        assert!(reason.to_string().contains("not supported on linux"));
    }

    #[test]
    fn test_capture_source_fallback_accessor() {
        let window = CaptureSource::Window {
            title: "Notepad".to_string(),
        };
        assert!(window.fallback().is_none());

        let plain = CaptureSource::FullScreen { fallback: None };
        assert!(plain.fallback().is_none());

        let downgraded = CaptureSource::FullScreen {
            fallback: Some(FallbackReason::WindowNotFound {
                filter: "x".to_string(),
            }),
        };
        assert!(downgraded.fallback().is_some());
    }
}
